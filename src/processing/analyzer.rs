//! Analysis pipeline: predict, resolve the target role, match and score

use crate::error::{CareerLensError, Result};
use crate::processing::catalog::{RoleCatalog, RoleName, SkillName};
use crate::processing::role_predictor::{predict, PredictionResult};
use crate::processing::scorer::score;
use crate::processing::skill_matcher::find_skills;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which role to score the resume against
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RoleSelection {
    /// Use the predicted role
    #[default]
    AutoDetect,
    Manual(RoleName),
}

impl FromStr for RoleSelection {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "" | "auto" | "auto-detect" => Ok(RoleSelection::AutoDetect),
            _ => Ok(RoleSelection::Manual(trimmed.to_string())),
        }
    }
}

impl fmt::Display for RoleSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleSelection::AutoDetect => write!(f, "auto-detect"),
            RoleSelection::Manual(role) => write!(f, "{}", role),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisInput {
    pub text: String,
    pub role: RoleSelection,
}

impl AnalysisInput {
    pub fn new(text: impl Into<String>, role: RoleSelection) -> Self {
        Self {
            text: text.into(),
            role,
        }
    }

    pub fn auto_detect(text: impl Into<String>) -> Self {
        Self::new(text, RoleSelection::AutoDetect)
    }
}

/// How the target role was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleSource {
    Manual,
    AutoDetected,
}

/// Immutable result of one analysis run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub role: RoleName,
    pub skills_found: Vec<SkillName>,
    pub missing_skills: Vec<SkillName>,
    pub score: u8,
}

/// Everything one run produces: the record plus the prediction that informed it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub record: AnalysisRecord,
    pub prediction: PredictionResult,
    pub role_source: RoleSource,
    pub required_count: usize,
}

/// Run the full pipeline over one resume text.
///
/// Prediction always runs, even for a manual selection, so callers can show
/// when the resume fits another role better. Either a complete analysis is
/// returned or an error; nothing is kept between calls.
pub fn analyze(input: &AnalysisInput, catalog: &RoleCatalog) -> Result<Analysis> {
    let prediction = predict(&input.text, catalog);
    debug!(
        "Predicted role {:?} with {} matching skills",
        prediction.role, prediction.match_count
    );

    let (role, role_source) = match &input.role {
        RoleSelection::Manual(name) => (catalog.require(name)?, RoleSource::Manual),
        RoleSelection::AutoDetect => {
            let name = prediction
                .role
                .as_deref()
                .ok_or(CareerLensError::NoRoleResolved)?;
            (catalog.require(name)?, RoleSource::AutoDetected)
        }
    };

    let skills_found = find_skills(&input.text, &role.skills);
    let scored = score(&skills_found, &role.skills)?;
    debug!(
        "Scored '{}': {} of {} skills, score {}",
        role.name,
        skills_found.len(),
        role.skills.len(),
        scored.score
    );

    Ok(Analysis {
        record: AnalysisRecord {
            role: role.name.clone(),
            skills_found,
            missing_skills: scored.missing_skills,
            score: scored.score,
        },
        prediction,
        role_source,
        required_count: role.skills.len(),
    })
}
