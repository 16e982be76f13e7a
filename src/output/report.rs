//! Report structures built from a finished analysis

use crate::processing::{Analysis, AnalysisRecord, PredictionResult, RoleSource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything a formatter needs to present one analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub record: AnalysisRecord,
    pub prediction: PredictionResult,
    pub role_source: RoleSource,
    /// Number of skills the target role requires
    pub required_count: usize,
    pub rating: ScoreRating,
    pub guidance: String,
    /// Note about the predicted role, when it is worth mentioning
    pub insight: Option<String>,
    pub improvement_plan: Vec<String>,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreRating {
    Strong,
    Moderate,
    Weak,
}

impl ScoreRating {
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => ScoreRating::Strong,
            50..=79 => ScoreRating::Moderate,
            _ => ScoreRating::Weak,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreRating::Strong => "STRONG MATCH",
            ScoreRating::Moderate => "PARTIAL MATCH",
            ScoreRating::Weak => "WEAK MATCH",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    pub resume_file: String,
    pub version: String,
}

impl AnalysisReport {
    pub fn new(analysis: Analysis, resume_file: impl Into<String>, processing_time_ms: u64) -> Self {
        let Analysis {
            record,
            prediction,
            role_source,
            required_count,
        } = analysis;

        let insight = insight_for(&record, &prediction, role_source);
        let improvement_plan = improvement_plan_for(&record);

        Self {
            rating: ScoreRating::from_score(record.score),
            guidance: guidance_for(record.score).to_string(),
            insight,
            improvement_plan,
            record,
            prediction,
            role_source,
            required_count,
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                processing_time_ms,
                resume_file: resume_file.into(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    pub fn summary_line(&self) -> String {
        format!(
            "You have {} matching skills out of {} required.",
            self.record.skills_found.len(),
            self.required_count
        )
    }
}

fn guidance_for(score: u8) -> &'static str {
    if score > 80 {
        "Ready to apply! Your resume is well-optimized for this role."
    } else if score > 50 {
        "Needs polish. Focus on adding the missing keywords."
    } else {
        "Gap identified. Significant skill acquisition is needed."
    }
}

fn insight_for(
    record: &AnalysisRecord,
    prediction: &PredictionResult,
    role_source: RoleSource,
) -> Option<String> {
    match role_source {
        RoleSource::AutoDetected => Some(format!(
            "Auto-detected: analyzed the profile as {} based on its content.",
            record.role
        )),
        RoleSource::Manual => prediction
            .role
            .as_ref()
            .filter(|predicted| **predicted != record.role)
            .map(|predicted| {
                format!(
                    "While you selected {}, the resume matches {} more strongly ({} skills matched).",
                    record.role, predicted, prediction.match_count
                )
            }),
    }
}

fn improvement_plan_for(record: &AnalysisRecord) -> Vec<String> {
    if record.missing_skills.is_empty() {
        return vec![format!(
            "No missing skills for {}. Keep the resume current with recent projects.",
            record.role
        )];
    }

    let focus: Vec<&str> = record
        .missing_skills
        .iter()
        .take(3)
        .map(String::as_str)
        .collect();

    vec![
        format!("Project work: build a project that uses {}.", focus.join(", ")),
        format!(
            "Certification: consider a certification in {} to validate your knowledge.",
            record.role
        ),
        "Resume formatting: make sure these keywords appear in your Skills and Experience sections."
            .to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(score: u8, missing: &[&str], predicted: Option<&str>, source: RoleSource) -> Analysis {
        Analysis {
            record: AnalysisRecord {
                role: "Data Scientist".to_string(),
                skills_found: vec!["python".to_string()],
                missing_skills: missing.iter().map(|s| s.to_string()).collect(),
                score,
            },
            prediction: PredictionResult {
                role: predicted.map(str::to_string),
                match_count: 4,
            },
            role_source: source,
            required_count: 1 + missing.len(),
        }
    }

    #[test]
    fn test_rating_bands() {
        assert_eq!(ScoreRating::from_score(100), ScoreRating::Strong);
        assert_eq!(ScoreRating::from_score(80), ScoreRating::Strong);
        assert_eq!(ScoreRating::from_score(79), ScoreRating::Moderate);
        assert_eq!(ScoreRating::from_score(50), ScoreRating::Moderate);
        assert_eq!(ScoreRating::from_score(49), ScoreRating::Weak);
    }

    #[test]
    fn test_guidance_thresholds_are_strict() {
        assert!(guidance_for(81).starts_with("Ready"));
        assert!(guidance_for(80).starts_with("Needs polish"));
        assert!(guidance_for(51).starts_with("Needs polish"));
        assert!(guidance_for(50).starts_with("Gap"));
    }

    #[test]
    fn test_manual_selection_mentions_better_role() {
        let report = AnalysisReport::new(
            analysis(25, &["sql"], Some("DevOps Engineer"), RoleSource::Manual),
            "cv.txt",
            3,
        );
        let insight = report.insight.unwrap();
        assert!(insight.contains("DevOps Engineer"));
        assert!(insight.contains("4 skills"));
    }

    #[test]
    fn test_manual_selection_matching_prediction_has_no_insight() {
        let report = AnalysisReport::new(
            analysis(25, &["sql"], Some("Data Scientist"), RoleSource::Manual),
            "cv.txt",
            3,
        );
        assert!(report.insight.is_none());

        let report = AnalysisReport::new(analysis(0, &["sql"], None, RoleSource::Manual), "cv.txt", 3);
        assert!(report.insight.is_none());
    }

    #[test]
    fn test_improvement_plan_uses_first_three_missing() {
        let report = AnalysisReport::new(
            analysis(20, &["sql", "ml", "spark", "r"], Some("Data Scientist"), RoleSource::AutoDetected),
            "cv.txt",
            3,
        );
        assert_eq!(report.improvement_plan.len(), 3);
        assert!(report.improvement_plan[0].contains("sql, ml, spark"));
        assert!(!report.improvement_plan[0].contains(", r."));
        assert!(report.insight.unwrap().starts_with("Auto-detected"));
    }

    #[test]
    fn test_complete_match_plan() {
        let report = AnalysisReport::new(
            analysis(100, &[], Some("Data Scientist"), RoleSource::AutoDetected),
            "cv.txt",
            3,
        );
        assert_eq!(report.improvement_plan.len(), 1);
        assert_eq!(report.summary_line(), "You have 1 matching skills out of 1 required.");
    }
}
