//! Skill matching and scoring module

pub mod catalog;
pub mod role_predictor;
pub mod skill_matcher;
pub mod scorer;
pub mod analyzer;

pub use analyzer::{analyze, Analysis, AnalysisInput, AnalysisRecord, RoleSelection, RoleSource};
pub use catalog::RoleCatalog;
pub use role_predictor::{predict, PredictionResult};
pub use scorer::score;
pub use skill_matcher::find_skills;
