//! Error types for output validation.

use thiserror::Error;

use crate::format::TargetFormat;

/// Result type alias for output operations.
pub type OutputResult<T> = Result<T, OutputError>;

/// Errors that can occur while validating rendered artifacts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OutputError {
    /// Rendered text does not parse as the declared target format.
    #[error("{format} output failed integrity check: {message}")]
    Integrity {
        format: TargetFormat,
        message: String,
        line: Option<usize>,
        column: Option<usize>,
    },

    #[error("Unknown target format: {0}")]
    UnknownFormat(String),
}

impl OutputError {
    /// Build an integrity error with a location baked into the message.
    pub fn integrity_at(
        format: TargetFormat,
        message: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        let message = message.into();
        OutputError::Integrity {
            format,
            message: format!("{} at line {}, column {}", message, line, column),
            line: Some(line),
            column: Some(column),
        }
    }

    /// Build an integrity error with no known location.
    pub fn integrity(format: TargetFormat, message: impl Into<String>) -> Self {
        OutputError::Integrity {
            format,
            message: message.into(),
            line: None,
            column: None,
        }
    }
}
