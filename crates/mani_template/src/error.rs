//! Error types for template parsing and rendering.

use thiserror::Error;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur while parsing or rendering a template.
///
/// Every variant carries the 1-based line and column of the offending
/// directive. Rendering never produces partial output: the first error
/// aborts the whole render.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    #[error("undefined reference `{path}` at line {line}, column {column}")]
    UndefinedReference {
        path: String,
        line: usize,
        column: usize,
    },

    #[error("type mismatch at line {line}, column {column}: {message}")]
    TypeMismatch {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("`{kind}` block opened at line {line}, column {column} is never closed")]
    UnterminatedBlock {
        kind: String,
        line: usize,
        column: usize,
    },

    #[error("syntax error at line {line}, column {column}: {message}")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },
}

impl TemplateError {
    /// Location of the offending directive.
    pub fn location(&self) -> (usize, usize) {
        match self {
            TemplateError::UndefinedReference { line, column, .. }
            | TemplateError::TypeMismatch { line, column, .. }
            | TemplateError::UnterminatedBlock { line, column, .. }
            | TemplateError::Syntax { line, column, .. } => (*line, *column),
        }
    }
}
