//! Models module
//!
//! Defines the parsed JDL input model and the JSON entity output model.

pub mod enums;
pub mod jdl;
pub mod json;

pub use enums::*;
pub use jdl::{
    EntityOption, EntitySelection, JPA_DERIVED_IDENTIFIER, JdlApplication, JdlEntity, JdlEnum,
    JdlEnumValue, JdlField, JdlObject, JdlOption, JdlRelationship, JdlValidation,
};
pub use json::{JsonEntity, JsonField, JsonRelationship};
