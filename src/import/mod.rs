//! Import functionality
//!
//! Reads JDL source text into a [`JdlObject`]:
//! - `lexer` turns text into line-tagged tokens
//! - `parser` builds the object model from the tokens

pub mod lexer;
pub mod parser;

use crate::models::JdlObject;
use std::path::Path;
use tracing::{debug, info};

pub use lexer::{LexError, Lexer, Token};
pub use parser::{ParseError, Parser};

/// Error during import
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),
    #[error("IO error reading {path}: {message}")]
    IoError { path: String, message: String },
}

/// JDL importer
#[derive(Debug, Default)]
pub struct JDLImporter;

impl JDLImporter {
    /// Create a new JDL importer
    pub fn new() -> Self {
        Self
    }

    /// Parse JDL source text.
    ///
    /// # Example
    ///
    /// ```
    /// use jdl_converter::import::JDLImporter;
    ///
    /// let jdl = JDLImporter::new()
    ///     .parse("entity Job { title String required }")
    ///     .unwrap();
    /// assert_eq!(jdl.entities.len(), 1);
    /// ```
    pub fn parse(&self, content: &str) -> Result<JdlObject, ImportError> {
        let jdl = Parser::new(content)?.parse()?;
        debug!(
            "Parsed {} entities, {} enums, {} relationships, {} options, {} applications",
            jdl.entities.len(),
            jdl.enums.len(),
            jdl.relationships.len(),
            jdl.options.len(),
            jdl.applications.len()
        );
        Ok(jdl)
    }

    /// Read and parse a `.jdl` file
    pub fn import_file(&self, path: &Path) -> Result<JdlObject, ImportError> {
        let content = std::fs::read_to_string(path).map_err(|e| ImportError::IoError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        info!("Importing JDL from {}", path.display());
        self.parse(&content)
    }

    /// Parse several sources into one object, in order
    pub fn parse_all<'a, I>(&self, contents: I) -> Result<JdlObject, ImportError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut merged = JdlObject::new();
        for content in contents {
            let jdl = self.parse(content)?;
            merged.applications.extend(jdl.applications);
            merged.entities.extend(jdl.entities);
            merged.enums.extend(jdl.enums);
            merged.relationships.extend(jdl.relationships);
            merged.options.extend(jdl.options);
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reports_lex_errors() {
        let err = JDLImporter::new().parse("entity Job { # }").unwrap_err();
        assert!(matches!(err, ImportError::ParseError(ParseError::Lex(_))));
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_import_missing_file() {
        let err = JDLImporter::new()
            .import_file(Path::new("/nonexistent/app.jdl"))
            .unwrap_err();
        assert!(matches!(err, ImportError::IoError { .. }));
    }

    #[test]
    fn test_parse_all_merges_sources() {
        let jdl = JDLImporter::new()
            .parse_all(["entity A", "entity B\nrelationship OneToOne { A to B }"])
            .unwrap();
        assert_eq!(jdl.entity_names(), vec!["A", "B"]);
        assert_eq!(jdl.relationships.len(), 1);
    }
}
