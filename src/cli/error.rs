//! CLI error type

use crate::convert::ConversionError;
use crate::export::ExportError;
use crate::import::ImportError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Failed to read {0}: {1}")]
    FileReadError(PathBuf, String),
    #[error("Invalid config file {0}: {1}")]
    ConfigError(PathBuf, String),
    #[error("Validation failed with {0} error(s)")]
    ValidationFailed(usize),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    #[error(transparent)]
    Export(#[from] ExportError),
}
