//! Parsed JDL model
//!
//! `JdlObject` is the in-memory form of one or more `.jdl` files: the input of
//! the JDL-to-JSON conversion. It is built by the importer (or by hand) and is
//! only ever borrowed by the converters.

use super::enums::{DtoOption, PaginationOption, RelationshipType, ServiceOption, ValidationKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Relationship option promoted to `useJPADerivedIdentifier` on the owner side
pub const JPA_DERIVED_IDENTIFIER: &str = "jpaDerivedIdentifier";

/// A complete parsed JDL document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JdlObject {
    #[serde(default)]
    pub applications: Vec<JdlApplication>,
    #[serde(default)]
    pub entities: Vec<JdlEntity>,
    #[serde(default)]
    pub enums: Vec<JdlEnum>,
    #[serde(default)]
    pub relationships: Vec<JdlRelationship>,
    #[serde(default)]
    pub options: Vec<JdlOption>,
}

impl JdlObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entity(&mut self, entity: JdlEntity) {
        self.entities.push(entity);
    }

    pub fn add_enum(&mut self, jdl_enum: JdlEnum) {
        self.enums.push(jdl_enum);
    }

    pub fn add_relationship(&mut self, relationship: JdlRelationship) {
        self.relationships.push(relationship);
    }

    pub fn add_option(&mut self, option: JdlOption) {
        self.options.push(option);
    }

    pub fn add_application(&mut self, application: JdlApplication) {
        self.applications.push(application);
    }

    pub fn entity(&self, name: &str) -> Option<&JdlEntity> {
        self.entities.iter().find(|e| e.name == name)
    }

    pub fn get_enum(&self, name: &str) -> Option<&JdlEnum> {
        self.enums.iter().find(|e| e.name == name)
    }

    pub fn has_enum(&self, name: &str) -> bool {
        self.get_enum(name).is_some()
    }

    /// Entity names in declaration order
    pub fn entity_names(&self) -> Vec<&str> {
        self.entities.iter().map(|e| e.name.as_str()).collect()
    }

    /// Applications whose entity selection includes `entity_name`
    pub fn applications_for_entity(&self, entity_name: &str) -> Vec<&JdlApplication> {
        self.applications
            .iter()
            .filter(|app| app.includes(entity_name))
            .collect()
    }
}

/// An `entity` declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JdlEntity {
    pub name: String,
    /// Explicit table name from `entity Name(table_name)`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(default)]
    pub fields: Vec<JdlField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl JdlEntity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_name: None,
            fields: Vec::new(),
            comment: None,
        }
    }

    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_field(mut self, field: JdlField) -> Self {
        self.fields.push(field);
        self
    }

    /// Table name the entity maps to, before snake-casing
    pub fn table_name_or_default(&self) -> &str {
        self.table_name.as_deref().unwrap_or(&self.name)
    }
}

/// A field inside an entity body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JdlField {
    pub name: String,
    /// Declared type: a primitive, an enum name or a blob subtype
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub validations: Vec<JdlValidation>,
    #[serde(default)]
    pub options: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl JdlField {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            validations: Vec::new(),
            options: BTreeMap::new(),
            comment: None,
        }
    }

    pub fn with_validation(mut self, validation: JdlValidation) -> Self {
        self.validations.push(validation);
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn has_validation(&self, kind: ValidationKind) -> bool {
        self.validations.iter().any(|v| v.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JdlValidation {
    pub kind: ValidationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl JdlValidation {
    pub fn new(kind: ValidationKind) -> Self {
        Self { kind, value: None }
    }

    pub fn with_value(kind: ValidationKind, value: impl Into<Value>) -> Self {
        Self {
            kind,
            value: Some(value.into()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// An `enum` declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JdlEnum {
    pub name: String,
    #[serde(default)]
    pub values: Vec<JdlEnumValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl JdlEnum {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(JdlEnumValue::new).collect(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Values as written to `fieldValues`: `NAME` or `NAME (custom)`
    pub fn values_as_strings(&self) -> Vec<String> {
        self.values.iter().map(JdlEnumValue::to_value_string).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JdlEnumValue {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl JdlEnumValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            custom_value: None,
            comment: None,
        }
    }

    fn to_value_string(&self) -> String {
        match &self.custom_value {
            Some(custom) => format!("{} ({})", self.name, custom),
            None => self.name.clone(),
        }
    }
}

/// One edge of a `relationship` block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JdlRelationship {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub relationship_type: RelationshipType,
    /// Raw injected field on the source side, `name` or `name(otherEntityField)`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub injected_field_in_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub injected_field_in_to: Option<String>,
    #[serde(default)]
    pub is_injected_field_in_from_required: bool,
    #[serde(default)]
    pub is_injected_field_in_to_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_in_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_in_to: Option<String>,
    #[serde(default)]
    pub options: BTreeMap<String, Value>,
}

impl JdlRelationship {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        relationship_type: RelationshipType,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            relationship_type,
            injected_field_in_from: None,
            injected_field_in_to: None,
            is_injected_field_in_from_required: false,
            is_injected_field_in_to_required: false,
            comment_in_from: None,
            comment_in_to: None,
            options: BTreeMap::new(),
        }
    }

    pub fn with_injected_fields(mut self, in_from: Option<&str>, in_to: Option<&str>) -> Self {
        self.injected_field_in_from = in_from.map(str::to_string);
        self.injected_field_in_to = in_to.map(str::to_string);
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }
}

/// Which entities an option or application applies to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntitySelection {
    /// `*` or `all`
    All,
    Named(Vec<String>),
}

impl EntitySelection {
    pub fn named<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EntitySelection::Named(names.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, entity_name: &str) -> bool {
        match self {
            EntitySelection::All => true,
            EntitySelection::Named(names) => names.iter().any(|n| n == entity_name),
        }
    }

    /// Expand the selection against the declared entities, dropping exclusions.
    ///
    /// Named entries are kept even when undeclared so callers can report them.
    pub fn resolve(&self, all_entities: &[&str], excluded: &[String]) -> Vec<String> {
        let candidates: Vec<String> = match self {
            EntitySelection::All => all_entities.iter().map(|s| s.to_string()).collect(),
            EntitySelection::Named(names) => names.clone(),
        };
        candidates
            .into_iter()
            .filter(|name| !excluded.contains(name))
            .collect()
    }
}

/// Entity-level option, typed by name and value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "name", content = "value")]
pub enum EntityOption {
    SkipClient,
    SkipServer,
    NoFluentMethod,
    Filter,
    ReadOnly,
    Embedded,
    Dto(DtoOption),
    Service(ServiceOption),
    Paginate(PaginationOption),
    Search(String),
    Microservice(String),
    AngularSuffix(String),
    ClientRootFolder(String),
}

impl EntityOption {
    /// Keyword used in JDL source (`dto`, `skipClient`, ...)
    pub fn keyword(&self) -> &'static str {
        match self {
            EntityOption::SkipClient => "skipClient",
            EntityOption::SkipServer => "skipServer",
            EntityOption::NoFluentMethod => "noFluentMethod",
            EntityOption::Filter => "filter",
            EntityOption::ReadOnly => "readOnly",
            EntityOption::Embedded => "embedded",
            EntityOption::Dto(_) => "dto",
            EntityOption::Service(_) => "service",
            EntityOption::Paginate(_) => "paginate",
            EntityOption::Search(_) => "search",
            EntityOption::Microservice(_) => "microservice",
            EntityOption::AngularSuffix(_) => "angularSuffix",
            EntityOption::ClientRootFolder(_) => "clientRootFolder",
        }
    }

    pub fn is_unary_keyword(keyword: &str) -> bool {
        matches!(
            keyword,
            "skipClient" | "skipServer" | "noFluentMethod" | "filter" | "readOnly" | "embedded"
        )
    }

    pub fn is_binary_keyword(keyword: &str) -> bool {
        matches!(
            keyword,
            "dto"
                | "service"
                | "paginate"
                | "search"
                | "microservice"
                | "angularSuffix"
                | "clientRootFolder"
        )
    }

    pub fn unary(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "skipClient" => EntityOption::SkipClient,
            "skipServer" => EntityOption::SkipServer,
            "noFluentMethod" => EntityOption::NoFluentMethod,
            "filter" => EntityOption::Filter,
            "readOnly" => EntityOption::ReadOnly,
            "embedded" => EntityOption::Embedded,
            _ => return None,
        })
    }

    /// Build a binary option from its keyword and `with` value
    pub fn binary(keyword: &str, value: &str) -> Result<Self, String> {
        Ok(match keyword {
            "dto" => EntityOption::Dto(value.parse()?),
            "service" => EntityOption::Service(value.parse()?),
            "paginate" => EntityOption::Paginate(value.parse()?),
            "search" => EntityOption::Search(value.to_string()),
            "microservice" => EntityOption::Microservice(value.to_string()),
            "angularSuffix" => EntityOption::AngularSuffix(value.to_string()),
            "clientRootFolder" => EntityOption::ClientRootFolder(value.to_string()),
            _ => return Err(format!("Unknown option: {}", keyword)),
        })
    }
}

/// An option declaration such as `dto * with mapstruct except Job`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JdlOption {
    pub option: EntityOption,
    pub entity_names: EntitySelection,
    #[serde(default)]
    pub excluded_names: Vec<String>,
}

impl JdlOption {
    pub fn new(option: EntityOption, entity_names: EntitySelection) -> Self {
        Self {
            option,
            entity_names,
            excluded_names: Vec::new(),
        }
    }

    pub fn excluding<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn resolve_entity_names(&self, all_entities: &[&str]) -> Vec<String> {
        self.entity_names.resolve(all_entities, &self.excluded_names)
    }
}

/// An `application { ... }` declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JdlApplication {
    pub base_name: String,
    /// Everything declared in the `config` block, `baseName` included
    #[serde(default)]
    pub config: BTreeMap<String, Value>,
    pub entity_names: EntitySelection,
    #[serde(default)]
    pub excluded_names: Vec<String>,
}

impl JdlApplication {
    pub fn new(base_name: impl Into<String>) -> Self {
        let base_name = base_name.into();
        let mut config = BTreeMap::new();
        config.insert("baseName".to_string(), Value::String(base_name.clone()));
        Self {
            base_name,
            config,
            entity_names: EntitySelection::Named(Vec::new()),
            excluded_names: Vec::new(),
        }
    }

    pub fn config_str(&self, key: &str) -> Option<&str> {
        self.config.get(key).and_then(Value::as_str)
    }

    pub fn includes(&self, entity_name: &str) -> bool {
        self.entity_names.contains(entity_name)
            && !self.excluded_names.iter().any(|n| n == entity_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_selection_resolution() {
        let all = ["A", "B", "C"];
        let excluded = vec!["B".to_string()];
        assert_eq!(EntitySelection::All.resolve(&all, &excluded), vec!["A", "C"]);
        assert_eq!(
            EntitySelection::named(["C", "B", "X"]).resolve(&all, &excluded),
            vec!["C", "X"]
        );
    }

    #[test]
    fn test_enum_values_with_custom_values() {
        let mut language = JdlEnum::new("Language", ["FRENCH", "ENGLISH"]);
        language.values[0].custom_value = Some("french".to_string());
        assert_eq!(
            language.values_as_strings(),
            vec!["FRENCH (french)", "ENGLISH"]
        );
    }

    #[test]
    fn test_binary_option_rejects_unknown_values() {
        assert_eq!(
            EntityOption::binary("dto", "mapstruct").unwrap(),
            EntityOption::Dto(DtoOption::Mapstruct)
        );
        assert!(EntityOption::binary("service", "serviceFactory").is_err());
        assert!(EntityOption::binary("colour", "blue").is_err());
    }

    #[test]
    fn test_application_includes_honours_exclusions() {
        let mut app = JdlApplication::new("store");
        app.entity_names = EntitySelection::All;
        app.excluded_names = vec!["Audit".to_string()];
        assert!(app.includes("Order"));
        assert!(!app.includes("Audit"));
        assert_eq!(app.config_str("baseName"), Some("store"));
    }
}
