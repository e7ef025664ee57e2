//! Error types for the compiled-logic oracle

use thiserror::Error;

/// Result type for oracle operations
pub type CqlResult<T> = Result<T, CqlError>;

/// Errors that can occur while reading a compiled artifact
#[derive(Debug, Error)]
pub enum CqlError {
    /// Artifact is absent or empty
    #[error("Compiled logic artifact is missing")]
    MissingArtifact,

    /// Artifact is not a readable ELM library
    #[error("Invalid compiled logic artifact: {0}")]
    InvalidArtifact(String),
}

impl CqlError {
    pub fn invalid_artifact(message: impl Into<String>) -> Self {
        Self::InvalidArtifact(message.into())
    }
}
