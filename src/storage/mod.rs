//! Persistence of completed analyses

pub mod history;

pub use history::{AnalysisStore, HistoryEntry, JsonlHistoryStore};
