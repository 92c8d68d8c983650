//! CLI command implementations

pub mod convert;
pub mod validate;

pub use convert::{ConvertArgs, handle_convert};
pub use validate::handle_validate;

use super::CliError;
use crate::import::JDLImporter;
use crate::models::JdlObject;
use std::io::Read;
use std::path::PathBuf;

/// Load input content from file or stdin (`-`)
pub(crate) fn load_input(input: &str) -> Result<String, CliError> {
    if input == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| CliError::InvalidArgument(format!("Failed to read stdin: {}", e)))?;
        Ok(content)
    } else {
        let path = PathBuf::from(input);
        std::fs::read_to_string(&path).map_err(|e| CliError::FileReadError(path, e.to_string()))
    }
}

pub(crate) fn load_jdl(input: &str) -> Result<JdlObject, CliError> {
    let content = load_input(input)?;
    Ok(JDLImporter::new().parse(&content)?)
}
