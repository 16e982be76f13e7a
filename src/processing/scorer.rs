//! Percentage score and missing-skill computation

use crate::error::{CareerLensError, Result};
use crate::processing::catalog::SkillName;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Integer percentage in `0..=100`, truncated rather than rounded
    pub score: u8,
    /// Required skills not among the found skills, in required-list order
    pub missing_skills: Vec<SkillName>,
}

/// Score `found_skills` against `required_skills`.
///
/// Skills compare case-insensitively. Found skills that are not required, and
/// repeats, do not count towards the score. An empty required list is a
/// catalog defect and is rejected instead of being scored.
pub fn score(found_skills: &[SkillName], required_skills: &[SkillName]) -> Result<ScoreResult> {
    if required_skills.is_empty() {
        return Err(CareerLensError::InvalidRoleConfiguration(
            "cannot score against an empty required-skill list".to_string(),
        ));
    }

    let found: HashSet<String> = found_skills.iter().map(|s| s.to_lowercase()).collect();

    let mut seen = HashSet::new();
    let mut matched = 0usize;
    let mut missing_skills = Vec::new();
    for skill in required_skills {
        let key = skill.to_lowercase();
        if !seen.insert(key.clone()) {
            continue;
        }
        if found.contains(&key) {
            matched += 1;
        } else {
            missing_skills.push(skill.clone());
        }
    }

    // seen.len() >= 1 here, and matched <= seen.len()
    let percentage = matched * 100 / seen.len();

    Ok(ScoreResult {
        score: percentage as u8,
        missing_skills,
    })
}
