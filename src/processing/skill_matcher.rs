//! Literal, case-insensitive skill containment

use crate::processing::catalog::SkillName;

/// Lowercase a document once so repeated containment tests are case-insensitive
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
}

/// Return the skills from `required_skills` that occur anywhere in `text`.
///
/// Matching is plain substring containment after lowercasing both sides, so
/// "java" is found inside "javascript". The result keeps the order of
/// `required_skills`.
pub fn find_skills(text: &str, required_skills: &[SkillName]) -> Vec<SkillName> {
    let normalized = normalize(text);
    find_skills_normalized(&normalized, required_skills)
}

pub(crate) fn find_skills_normalized(
    normalized_text: &str,
    required_skills: &[SkillName],
) -> Vec<SkillName> {
    required_skills
        .iter()
        .filter(|skill| normalized_text.contains(&skill.to_lowercase()))
        .cloned()
        .collect()
}
