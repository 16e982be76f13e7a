//! Career lens library: resume skill matching against role keyword catalogs

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod output;
pub mod storage;

pub use error::{CareerLensError, Result};
pub use config::Config;
pub use processing::{analyze, Analysis, AnalysisInput, AnalysisRecord, RoleCatalog, RoleSelection};
