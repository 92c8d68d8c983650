//! Semantic validation of a parsed JDL object
//!
//! Runs before conversion and never changes the object. Findings that make the
//! generated code unusable are errors; findings the converter tolerates (by
//! skipping or ignoring something) are warnings.

use super::input::{validate_entity_name, validate_enum_name, validate_enum_value, validate_field_name};
use crate::convert::is_built_in_entity;
use crate::models::{
    DatabaseType, DtoOption, EntityOption, EntitySelection, JPA_DERIVED_IDENTIFIER, JdlEntity,
    JdlObject, PaginationOption, RelationshipType, ServiceOption, ValidationKind,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Result of validating a JDL object
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    fn error(&mut self, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            severity: Severity::Error,
            message: message.into(),
        });
    }

    fn warning(&mut self, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            severity: Severity::Warning,
            message: message.into(),
        });
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Field types understood by the generators, with the validations each accepts
const FIELD_TYPES: &[(&str, &[ValidationKind])] = &[
    ("String", STRING_VALIDATIONS),
    ("Integer", NUMERIC_VALIDATIONS),
    ("Long", NUMERIC_VALIDATIONS),
    ("BigDecimal", NUMERIC_VALIDATIONS),
    ("Float", NUMERIC_VALIDATIONS),
    ("Double", NUMERIC_VALIDATIONS),
    ("Boolean", BASIC_VALIDATIONS),
    ("LocalDate", BASIC_VALIDATIONS),
    ("LocalTime", BASIC_VALIDATIONS),
    ("ZonedDateTime", BASIC_VALIDATIONS),
    ("Instant", BASIC_VALIDATIONS),
    ("Duration", BASIC_VALIDATIONS),
    ("UUID", BASIC_VALIDATIONS),
    ("Blob", BLOB_VALIDATIONS),
    ("AnyBlob", BLOB_VALIDATIONS),
    ("ImageBlob", BLOB_VALIDATIONS),
    ("TextBlob", BASIC_VALIDATIONS),
];

const BASIC_VALIDATIONS: &[ValidationKind] = &[ValidationKind::Required, ValidationKind::Unique];

const STRING_VALIDATIONS: &[ValidationKind] = &[
    ValidationKind::Required,
    ValidationKind::Unique,
    ValidationKind::MinLength,
    ValidationKind::MaxLength,
    ValidationKind::Pattern,
];

const NUMERIC_VALIDATIONS: &[ValidationKind] = &[
    ValidationKind::Required,
    ValidationKind::Unique,
    ValidationKind::Min,
    ValidationKind::Max,
];

const BLOB_VALIDATIONS: &[ValidationKind] = &[
    ValidationKind::Required,
    ValidationKind::Unique,
    ValidationKind::MinBytes,
    ValidationKind::MaxBytes,
];

/// Validations accepted by a built-in field type; `None` for unknown types
pub fn applicable_validations(field_type: &str) -> Option<&'static [ValidationKind]> {
    FIELD_TYPES
        .iter()
        .find(|(name, _)| *name == field_type)
        .map(|(_, validations)| *validations)
}

/// JDL object validator
#[derive(Debug, Default)]
pub struct JdlValidator;

impl JdlValidator {
    /// Create a new JDL validator
    pub fn new() -> Self {
        Self
    }

    /// Validate `jdl`; `database_type` enables database-specific checks
    pub fn validate(&self, jdl: &JdlObject, database_type: Option<DatabaseType>) -> ValidationReport {
        let mut report = ValidationReport::default();

        self.check_declarations(jdl, &mut report);
        for entity in &jdl.entities {
            self.check_fields(jdl, entity, &mut report);
        }
        self.check_relationships(jdl, &mut report);
        self.check_options(jdl, database_type, &mut report);
        self.check_applications(jdl, &mut report);

        debug!(
            "Validation finished with {} issues ({} errors)",
            report.issues.len(),
            report.errors().count()
        );
        report
    }

    fn check_declarations(&self, jdl: &JdlObject, report: &mut ValidationReport) {
        let mut seen = HashSet::new();
        for entity in &jdl.entities {
            if let Err(e) = validate_entity_name(&entity.name) {
                report.error(e.to_string());
            }
            if !seen.insert(entity.name.as_str()) {
                report.error(format!("Entity {} is declared more than once", entity.name));
            }
        }

        let mut enum_names = HashSet::new();
        for jdl_enum in &jdl.enums {
            if let Err(e) = validate_enum_name(&jdl_enum.name) {
                report.error(e.to_string());
            }
            if seen.contains(jdl_enum.name.as_str()) && !enum_names.contains(jdl_enum.name.as_str()) {
                report.error(format!(
                    "{} is declared both as an entity and an enum",
                    jdl_enum.name
                ));
            }
            if !enum_names.insert(jdl_enum.name.as_str()) {
                report.error(format!("Enum {} is declared more than once", jdl_enum.name));
            }

            let mut values = HashSet::new();
            for value in &jdl_enum.values {
                if let Err(e) = validate_enum_value(&value.name) {
                    report.error(e.to_string());
                }
                if !values.insert(value.name.as_str()) {
                    report.error(format!(
                        "Enum {} declares value {} more than once",
                        jdl_enum.name, value.name
                    ));
                }
            }
        }
    }

    fn check_fields(&self, jdl: &JdlObject, entity: &JdlEntity, report: &mut ValidationReport) {
        let mut seen = HashSet::new();
        for field in &entity.fields {
            if let Err(e) = validate_field_name(&field.name) {
                report.error(format!("{}: {}", entity.name, e));
            }
            if !seen.insert(field.name.as_str()) {
                report.error(format!(
                    "{} declares field {} more than once",
                    entity.name, field.name
                ));
            }

            let applicable = if jdl.has_enum(&field.field_type) {
                BASIC_VALIDATIONS
            } else if let Some(applicable) = applicable_validations(&field.field_type) {
                applicable
            } else {
                report.error(format!(
                    "{}.{} has unknown type {}",
                    entity.name, field.name, field.field_type
                ));
                continue;
            };

            for validation in &field.validations {
                if !applicable.contains(&validation.kind) {
                    report.error(format!(
                        "{}.{}: validation {} is not applicable to type {}",
                        entity.name,
                        field.name,
                        validation.name(),
                        field.field_type
                    ));
                } else if validation.kind.takes_value() && validation.value.is_none() {
                    report.error(format!(
                        "{}.{}: validation {} requires a value",
                        entity.name,
                        field.name,
                        validation.name()
                    ));
                }
            }
        }
    }

    fn check_relationships(&self, jdl: &JdlObject, report: &mut ValidationReport) {
        let declared: HashSet<&str> = jdl.entity_names().into_iter().collect();

        for relationship in &jdl.relationships {
            let description = format!(
                "{} relationship from {} to {}",
                relationship.relationship_type, relationship.from, relationship.to
            );

            if is_built_in_entity(&relationship.from) {
                if !relationship.options.contains_key("builtInEntity") {
                    report.error(format!(
                        "{}: built-in entity {} cannot be the source of a relationship",
                        description, relationship.from
                    ));
                }
            } else if !declared.contains(relationship.from.as_str()) {
                report.error(format!(
                    "{}: entity {} is not declared",
                    description, relationship.from
                ));
            }

            if !is_built_in_entity(&relationship.to) && !declared.contains(relationship.to.as_str()) {
                report.error(format!(
                    "{}: entity {} is not declared",
                    description, relationship.to
                ));
            }

            if relationship.options.contains_key(JPA_DERIVED_IDENTIFIER)
                && relationship.relationship_type != RelationshipType::OneToOne
            {
                report.warning(format!(
                    "{}: {} is only supported on one-to-one relationships",
                    description, JPA_DERIVED_IDENTIFIER
                ));
            }
        }
    }

    fn check_options(
        &self,
        jdl: &JdlObject,
        database_type: Option<DatabaseType>,
        report: &mut ValidationReport,
    ) {
        let entity_names = jdl.entity_names();
        let declared: HashSet<&str> = entity_names.iter().copied().collect();
        // entity name -> options that end up applied to it
        let mut applied: BTreeMap<String, Vec<&EntityOption>> = BTreeMap::new();

        for jdl_option in &jdl.options {
            let keyword = jdl_option.option.keyword();
            if let EntitySelection::Named(names) = &jdl_option.entity_names {
                for name in names.iter().filter(|n| !declared.contains(n.as_str())) {
                    report.warning(format!("Option {} names unknown entity {}", keyword, name));
                }
            }
            for name in jdl_option
                .excluded_names
                .iter()
                .filter(|n| !declared.contains(n.as_str()))
            {
                report.warning(format!("Option {} excludes unknown entity {}", keyword, name));
            }

            for name in jdl_option.resolve_entity_names(&entity_names) {
                if declared.contains(name.as_str()) {
                    applied.entry(name).or_default().push(&jdl_option.option);
                }
            }
        }

        for (entity_name, options) in &applied {
            let embedded = options.iter().any(|o| matches!(o, EntityOption::Embedded));
            if embedded {
                for option in options {
                    let conflicts = match option {
                        EntityOption::Dto(dto) => *dto != DtoOption::No,
                        EntityOption::Service(service) => *service != ServiceOption::No,
                        EntityOption::Paginate(pagination) => *pagination != PaginationOption::No,
                        _ => false,
                    };
                    if conflicts {
                        report.warning(format!(
                            "{} is embedded, option {} has no effect",
                            entity_name,
                            option.keyword()
                        ));
                    }
                }
            }

            if let Some(database_type) = database_type
                && !database_type.is_sql()
                && options.iter().any(|o| matches!(o, EntityOption::Filter))
            {
                report.warning(format!(
                    "{}: filter is only available with SQL databases and will be ignored",
                    entity_name
                ));
            }
        }
    }

    fn check_applications(&self, jdl: &JdlObject, report: &mut ValidationReport) {
        let mut seen = HashSet::new();
        for application in &jdl.applications {
            if !seen.insert(application.base_name.as_str()) {
                report.error(format!(
                    "Application {} is declared more than once",
                    application.base_name
                ));
            }
            if let EntitySelection::Named(names) = &application.entity_names {
                for name in names.iter().filter(|n| jdl.entity(n).is_none()) {
                    report.warning(format!(
                        "Application {} includes unknown entity {}",
                        application.base_name, name
                    ));
                }
            }
        }
    }
}
