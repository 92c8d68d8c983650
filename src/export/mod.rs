//! Export functionality
//!
//! Renders converted entities as `.jhipster/<Entity>.json` documents.

pub mod json;

/// Result of an export operation
#[derive(Debug)]
pub struct ExportResult {
    /// Exported content
    pub content: String,
    /// Format identifier
    pub format: String,
}

/// Error during export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("IO error: {0}")]
    IoError(String),
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::SerializationError(err.to_string())
    }
}

pub use json::{JHIPSTER_DIRECTORY, JsonEntityExporter};
