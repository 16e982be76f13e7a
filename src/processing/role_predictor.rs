//! Best-matching role prediction by keyword count

use crate::processing::catalog::{RoleCatalog, RoleName};
use crate::processing::skill_matcher::normalize;
use serde::{Deserialize, Serialize};

/// Outcome of role prediction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// `None` when the catalog is empty or no role matched any skill
    pub role: Option<RoleName>,
    /// Number of the predicted role's skills found in the text
    pub match_count: usize,
}

impl PredictionResult {
    pub fn none() -> Self {
        Self {
            role: None,
            match_count: 0,
        }
    }
}

/// Match count for a single role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleScore {
    pub role: RoleName,
    pub match_count: usize,
    pub required_count: usize,
}

/// Count, for every role in catalog order, how many of its skills occur in `text`
pub fn role_scores(text: &str, catalog: &RoleCatalog) -> Vec<RoleScore> {
    let normalized = normalize(text);
    let present = catalog.keywords_present(&normalized);

    catalog
        .roles()
        .map(|role| RoleScore {
            role: role.name.clone(),
            match_count: role.keyword_ids().iter().filter(|&&id| present[id]).count(),
            required_count: role.skills.len(),
        })
        .collect()
}

/// Predict the role whose skills appear most often in `text`.
///
/// Only a strictly greater count replaces the current leader, so on a tie the
/// role listed first in the catalog wins.
pub fn predict(text: &str, catalog: &RoleCatalog) -> PredictionResult {
    role_scores(text, catalog)
        .into_iter()
        .fold(PredictionResult::none(), |best, candidate| {
            if candidate.match_count > best.match_count {
                PredictionResult {
                    role: Some(candidate.role),
                    match_count: candidate.match_count,
                }
            } else {
                best
            }
        })
}

/// Role scores sorted by match count, highest first; ties keep catalog order
pub fn ranked_roles(text: &str, catalog: &RoleCatalog) -> Vec<RoleScore> {
    let mut scores = role_scores(text, catalog);
    scores.sort_by(|a, b| b.match_count.cmp(&a.match_count));
    scores
}
