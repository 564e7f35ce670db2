//! Error types for the render pipeline.

use thiserror::Error;

use mani_descriptor::DescriptorError;
use mani_output::OutputError;
use mani_template::TemplateError;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur during a render pipeline run.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("Descriptor error: {0}")]
    Descriptor(#[from] DescriptorError),

    #[error("Template file is not valid UTF-8: {0}")]
    NotText(std::path::PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
