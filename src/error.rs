//! Error handling for the career lens application

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CareerLensError {
    #[error("Invalid role configuration: {0}")]
    InvalidRoleConfiguration(String),

    #[error("No role could be resolved: the catalog is empty or no role matched the resume")]
    NoRoleResolved,

    #[error("Unknown role '{role}'{}", did_you_mean(.suggestion))]
    UnknownRole {
        role: String,
        suggestion: Option<String>,
    },

    #[error("Text extraction failed: {0}")]
    ExtractionFailure(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("History store error: {0}")]
    Persistence(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, CareerLensError>;

fn did_you_mean(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(" (did you mean '{}'?)", s))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_role_message_with_suggestion() {
        let err = CareerLensError::UnknownRole {
            role: "Data Scientst".to_string(),
            suggestion: Some("Data Scientist".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Unknown role 'Data Scientst' (did you mean 'Data Scientist'?)"
        );
    }

    #[test]
    fn test_unknown_role_message_without_suggestion() {
        let err = CareerLensError::UnknownRole {
            role: "Astronaut".to_string(),
            suggestion: None,
        };
        assert_eq!(err.to_string(), "Unknown role 'Astronaut'");
    }
}
