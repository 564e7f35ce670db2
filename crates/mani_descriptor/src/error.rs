//! Error types for descriptors.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for descriptor operations.
pub type DescriptorResult<T> = Result<T, DescriptorError>;

/// Errors that can occur while loading or converting descriptors.
#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("Descriptor not found: {0}")]
    NotFound(PathBuf),

    #[error("Descriptor root must be a mapping, found {0}")]
    NotAMapping(String),

    #[error("Mapping keys must be strings, found key `{0}`")]
    NonStringKey(String),

    #[error("Invalid descriptor: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
