//! Validation functionality
//!
//! Provides validation logic for:
//! - Identifiers (entity, enum, field and enum value names)
//! - Whole JDL objects (declarations, field types, relationships, options)

pub mod input;
pub mod jdl;

pub use input::ValidationError;
pub use jdl::{JdlValidator, Severity, ValidationIssue, ValidationReport};
