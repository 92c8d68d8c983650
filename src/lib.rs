//! JDL Converter - turns JHipster Domain Language models into entity configurations
//!
//! Provides:
//! - JDL import (lexer and parser producing a [`JdlObject`])
//! - Semantic validation of the parsed model
//! - Conversion to the `.jhipster/<Entity>.json` entity model
//! - JSON export of the converted entities
//!
//! # Example
//!
//! ```
//! use jdl_converter::{ConversionConfig, DatabaseType, JDLImporter, convert};
//!
//! let jdl = JDLImporter::new()
//!     .parse("entity Job { title String }\nentity Task\nrelationship ManyToMany { Job{task} to Task{job} }")
//!     .unwrap();
//! let entities = convert(&jdl, &ConversionConfig::new("jobs", DatabaseType::Sql)).unwrap();
//!
//! assert_eq!(entities["Job"].relationships[0].other_entity_name, "task");
//! assert_eq!(entities["Task"].relationships[0].relationship_name, "job");
//! ```

pub mod convert;
pub mod export;
pub mod import;
pub mod models;
pub mod utils;
pub mod validation;

#[cfg(feature = "cli")]
pub mod cli;

pub use convert::{
    ConversionConfig, ConversionConfigBuilder, ConversionError, EntityMap, JdlToJsonConverter,
    convert, convert_applications,
};
pub use export::{ExportError, ExportResult, JsonEntityExporter};
pub use import::{ImportError, JDLImporter};
pub use validation::{JdlValidator, Severity, ValidationError, ValidationIssue, ValidationReport};

pub use models::enums::*;
pub use models::{
    EntityOption, EntitySelection, JdlApplication, JdlEntity, JdlEnum, JdlField, JdlObject,
    JdlOption, JdlRelationship, JdlValidation, JsonEntity, JsonField, JsonRelationship,
};
