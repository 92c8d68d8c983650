//! JSON entity configuration model
//!
//! These are the documents written to `.jhipster/<Entity>.json` and consumed by
//! the template generators. Key names follow the generator's camelCase schema.

use super::enums::{BlobContent, DtoOption, PaginationOption, RelationshipType, ServiceOption};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

fn is_false(value: &bool) -> bool {
    !*value
}

fn default_true() -> bool {
    true
}

/// Converted entity configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonEntity {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<JsonField>,
    #[serde(default)]
    pub relationships: Vec<JsonRelationship>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changelog_date: Option<String>,
    pub entity_table_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub javadoc: Option<String>,
    #[serde(default)]
    pub dto: DtoOption,
    #[serde(default)]
    pub pagination: PaginationOption,
    #[serde(default)]
    pub service: ServiceOption,
    #[serde(default)]
    pub jpa_metamodel_filtering: bool,
    #[serde(default = "default_true")]
    pub fluent_methods: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub embedded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_engine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub microservice_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_root_folder: Option<String>,
    #[serde(rename = "angularJSSuffix", skip_serializing_if = "Option::is_none")]
    pub angular_js_suffix: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub skip_client: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub skip_server: bool,
    #[serde(default)]
    pub applications: Vec<String>,
}

impl JsonEntity {
    /// Create an entity shell with the generator defaults
    pub fn new(name: impl Into<String>, entity_table_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            relationships: Vec::new(),
            changelog_date: None,
            entity_table_name: entity_table_name.into(),
            javadoc: None,
            dto: DtoOption::No,
            pagination: PaginationOption::No,
            service: ServiceOption::No,
            jpa_metamodel_filtering: false,
            fluent_methods: true,
            read_only: false,
            embedded: false,
            search_engine: None,
            microservice_name: None,
            client_root_folder: None,
            angular_js_suffix: None,
            skip_client: false,
            skip_server: false,
            applications: Vec::new(),
        }
    }

    pub fn field(&self, field_name: &str) -> Option<&JsonField> {
        self.fields.iter().find(|f| f.field_name == field_name)
    }

    pub fn relationship(&self, relationship_name: &str) -> Option<&JsonRelationship> {
        self.relationships
            .iter()
            .find(|r| r.relationship_name == relationship_name)
    }
}

/// Converted field descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonField {
    pub field_name: String,
    pub field_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub javadoc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_values_javadocs: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_type_javadoc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_type_blob_content: Option<BlobContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_validate_rules: Option<Vec<String>>,
    /// `fieldValidateRulesMaxlength` and friends, flattened into the field
    #[serde(flatten)]
    pub validate_rule_values: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<BTreeMap<String, Value>>,
}

impl JsonField {
    pub fn new(field_name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            field_type: field_type.into(),
            javadoc: None,
            field_values: None,
            field_values_javadocs: None,
            field_type_javadoc: None,
            field_type_blob_content: None,
            field_validate_rules: None,
            validate_rule_values: BTreeMap::new(),
            options: None,
        }
    }
}

/// Converted relationship descriptor, one per side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonRelationship {
    pub relationship_type: RelationshipType,
    pub relationship_name: String,
    pub other_entity_name: String,
    pub other_entity_field: String,
    pub other_entity_relationship_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_side: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_validate_rules: Option<String>,
    #[serde(
        rename = "useJPADerivedIdentifier",
        skip_serializing_if = "Option::is_none"
    )]
    pub use_jpa_derived_identifier: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub javadoc: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, Value>,
}

impl JsonRelationship {
    pub fn is_owner_side(&self) -> bool {
        self.owner_side == Some(true)
    }
}
