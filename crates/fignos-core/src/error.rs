//! Error types for fignos-core

use fignos_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder};
use thiserror::Error;

use crate::readers::json::JsonReadError;

/// Fatal conditions. Everything recoverable is a diagnostic instead.
#[derive(Error, Debug)]
pub enum FignosError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed pandoc JSON: {0}")]
    Json(#[from] JsonReadError),

    #[error("Failed to serialize pandoc JSON: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid value for `{key}`: {message}")]
    InvalidConfiguration { key: String, message: String },
}

impl FignosError {
    pub fn invalid_configuration(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Render this error as a structured diagnostic for reporting.
    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        match self {
            FignosError::InvalidConfiguration { key, message } => {
                DiagnosticMessageBuilder::error("Invalid configuration")
                    .with_code("F-2-1")
                    .with_subject(key.clone())
                    .problem(format!("`{}` {}", key, message))
                    .add_hint("Check the fignos variables in the document metadata?")
                    .build()
            }
            other => DiagnosticMessageBuilder::error("pandoc-fignos failed")
                .with_code("F-0-1")
                .problem(other.to_string())
                .build(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FignosError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_display() {
        let err = FignosError::invalid_configuration("fignos-cleveref", "must be a boolean");
        assert_eq!(
            err.to_string(),
            "Invalid value for `fignos-cleveref`: must be a boolean"
        );
    }

    #[test]
    fn test_invalid_configuration_diagnostic_code() {
        let err = FignosError::invalid_configuration("fignos-plus-name", "must have 2 entries");
        let diagnostic = err.to_diagnostic();
        assert_eq!(diagnostic.code.as_deref(), Some("F-2-1"));
        assert_eq!(diagnostic.subject.as_deref(), Some("fignos-plus-name"));
    }

    #[test]
    fn test_other_errors_are_internal() {
        let err = FignosError::from(std::io::Error::other("broken pipe"));
        let diagnostic = err.to_diagnostic();
        assert_eq!(diagnostic.code.as_deref(), Some("F-0-1"));
        assert!(diagnostic.to_text().contains("broken pipe"));
    }
}
