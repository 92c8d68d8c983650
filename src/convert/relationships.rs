//! Relationship conversion
//!
//! Every JDL relationship edge produces a descriptor on its source entity and,
//! when the inverse side is requested, one on its target entity. Many-to-many
//! edges without an explicit inverse get one synthesized on the target unless
//! the target is a built-in entity (`User`, `Authority`).
//!
//! Descriptors are collected in a [`RelationshipAccumulator`] owned by the
//! caller for the duration of a single conversion.

use crate::models::{
    JPA_DERIVED_IDENTIFIER, JdlRelationship, JsonRelationship, RelationshipType,
};
use crate::utils::{camel_case, format_comment, lower_first};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Entities generated by the platform itself; relationships to them are one-directional
pub const BUILT_IN_ENTITIES: [&str; 2] = ["user", "authority"];

/// Default `otherEntityField`
pub const DEFAULT_OTHER_ENTITY_FIELD: &str = "id";

/// `relationshipValidateRules` value for required relationships
pub const REQUIRED: &str = "required";

pub fn is_built_in_entity(entity_name: &str) -> bool {
    BUILT_IN_ENTITIES
        .iter()
        .any(|built_in| built_in.eq_ignore_ascii_case(entity_name))
}

/// Converted relationships keyed by JDL entity name
pub type RelationshipMap = BTreeMap<String, Vec<JsonRelationship>>;

/// Per-call accumulator of converted relationship descriptors.
///
/// Only entities registered up front receive descriptors.
#[derive(Debug, Default)]
pub struct RelationshipAccumulator {
    by_entity: RelationshipMap,
}

impl RelationshipAccumulator {
    pub fn new<'a>(entity_names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            by_entity: entity_names
                .into_iter()
                .map(|name| (name.to_string(), Vec::new()))
                .collect(),
        }
    }

    fn push(&mut self, entity_name: &str, relationship: JsonRelationship) {
        match self.by_entity.get_mut(entity_name) {
            Some(relationships) => relationships.push(relationship),
            None => debug!(
                "Dropping relationship '{}' for undeclared entity {}",
                relationship.relationship_name, entity_name
            ),
        }
    }

    pub fn into_map(self) -> RelationshipMap {
        self.by_entity
    }
}

/// Relationships touching one entity, split by the side it sits on
struct RelatedRelationships<'a> {
    from: Vec<&'a JdlRelationship>,
    to: Vec<&'a JdlRelationship>,
}

/// Convert all relationship edges for the given entities
pub fn convert_relationships(
    relationships: &[JdlRelationship],
    entity_names: &[&str],
) -> RelationshipMap {
    let mut accumulator = RelationshipAccumulator::new(entity_names.iter().copied());
    if relationships.is_empty() {
        return accumulator.into_map();
    }

    for entity_name in entity_names {
        let related = related_relationships(relationships, entity_name);
        for relationship in related.from {
            convert_source_side(relationship, &mut accumulator);
        }
        for relationship in related.to {
            convert_destination_side(relationship, &mut accumulator);
        }
    }

    accumulator.into_map()
}

fn related_relationships<'a>(
    relationships: &'a [JdlRelationship],
    entity_name: &str,
) -> RelatedRelationships<'a> {
    let from = relationships
        .iter()
        .filter(|r| r.from == entity_name)
        .collect();
    let to = relationships
        .iter()
        .filter(|r| r.to == entity_name && r.injected_field_in_to.is_some())
        .collect();
    RelatedRelationships { from, to }
}

/// An injected field split into its relationship name and optional display field.
///
/// `job(title)` gives (`job`, `Some("title")`).
#[derive(Debug, PartialEq)]
pub struct InjectedField<'a> {
    pub relationship_name: &'a str,
    pub other_entity_field: Option<&'a str>,
}

pub fn extract_field(injected_field: &str) -> InjectedField<'_> {
    let injected_field = injected_field.trim();
    if let Some((name, rest)) = injected_field.split_once('(') {
        let other = rest.trim_end_matches(')').trim();
        InjectedField {
            relationship_name: name.trim(),
            other_entity_field: (!other.is_empty()).then_some(other),
        }
    } else {
        InjectedField {
            relationship_name: injected_field,
            other_entity_field: None,
        }
    }
}

/// Name of the descriptor on the source entity
fn source_relationship_name(relationship: &JdlRelationship) -> String {
    match relationship.injected_field_in_from.as_deref() {
        Some(injected) => camel_case(extract_field(injected).relationship_name),
        None => camel_case(&relationship.to),
    }
}

/// Name of the descriptor on the target entity (explicit or synthesized)
fn destination_relationship_name(relationship: &JdlRelationship) -> String {
    match relationship.injected_field_in_to.as_deref() {
        Some(injected) => camel_case(extract_field(injected).relationship_name),
        None => camel_case(&relationship.from),
    }
}

fn other_entity_field(injected_field: Option<&str>) -> String {
    injected_field
        .and_then(|injected| extract_field(injected).other_entity_field)
        .map(lower_first)
        .unwrap_or_else(|| DEFAULT_OTHER_ENTITY_FIELD.to_string())
}

fn convert_source_side(relationship: &JdlRelationship, accumulator: &mut RelationshipAccumulator) {
    let relationship_name = source_relationship_name(relationship);
    let mut converted = JsonRelationship {
        relationship_type: relationship.relationship_type,
        relationship_name: relationship_name.clone(),
        other_entity_name: camel_case(&relationship.to),
        other_entity_field: other_entity_field(relationship.injected_field_in_from.as_deref()),
        other_entity_relationship_name: lower_first(&destination_relationship_name(relationship)),
        owner_side: None,
        relationship_validate_rules: relationship
            .is_injected_field_in_from_required
            .then(|| REQUIRED.to_string()),
        use_jpa_derived_identifier: None,
        javadoc: relationship.comment_in_from.as_deref().and_then(format_comment),
        options: BTreeMap::new(),
    };

    match relationship.relationship_type {
        RelationshipType::OneToOne => converted.owner_side = Some(true),
        RelationshipType::OneToMany | RelationshipType::ManyToOne => {}
        RelationshipType::ManyToMany => {
            converted.owner_side = Some(true);
            if relationship.injected_field_in_to.is_none() {
                synthesize_many_to_many_inverse(relationship, &relationship_name, accumulator);
            }
        }
    }

    apply_relationship_options(relationship, &mut converted);
    accumulator.push(&relationship.from, converted);
}

/// Inverse side of a many-to-many declared from one side only
fn synthesize_many_to_many_inverse(
    relationship: &JdlRelationship,
    source_relationship_name: &str,
    accumulator: &mut RelationshipAccumulator,
) {
    if is_built_in_entity(&relationship.to) {
        debug!(
            "Not synthesizing the inverse of {} -> {}: built-in target",
            relationship.from, relationship.to
        );
        return;
    }

    let mut inverse = JsonRelationship {
        relationship_type: RelationshipType::ManyToMany,
        relationship_name: camel_case(&relationship.from),
        other_entity_name: camel_case(&relationship.from),
        other_entity_field: DEFAULT_OTHER_ENTITY_FIELD.to_string(),
        other_entity_relationship_name: lower_first(source_relationship_name),
        owner_side: Some(false),
        relationship_validate_rules: None,
        use_jpa_derived_identifier: None,
        javadoc: None,
        options: BTreeMap::new(),
    };
    apply_relationship_options(relationship, &mut inverse);
    accumulator.push(&relationship.to, inverse);
}

fn convert_destination_side(
    relationship: &JdlRelationship,
    accumulator: &mut RelationshipAccumulator,
) {
    let mut converted = JsonRelationship {
        relationship_type: relationship.relationship_type.inverse(),
        relationship_name: destination_relationship_name(relationship),
        other_entity_name: camel_case(&relationship.from),
        other_entity_field: other_entity_field(relationship.injected_field_in_to.as_deref()),
        other_entity_relationship_name: lower_first(&source_relationship_name(relationship)),
        owner_side: None,
        relationship_validate_rules: relationship
            .is_injected_field_in_to_required
            .then(|| REQUIRED.to_string()),
        use_jpa_derived_identifier: None,
        javadoc: relationship.comment_in_to.as_deref().and_then(format_comment),
        options: BTreeMap::new(),
    };

    match relationship.relationship_type {
        RelationshipType::OneToOne | RelationshipType::ManyToMany => {
            converted.owner_side = Some(false)
        }
        RelationshipType::OneToMany | RelationshipType::ManyToOne => {}
    }

    apply_relationship_options(relationship, &mut converted);
    accumulator.push(&relationship.to, converted);
}

/// Copy relationship options; `jpaDerivedIdentifier` only counts on the owner side
fn apply_relationship_options(relationship: &JdlRelationship, converted: &mut JsonRelationship) {
    for (name, value) in &relationship.options {
        if name == JPA_DERIVED_IDENTIFIER {
            if converted.is_owner_side() {
                converted.use_jpa_derived_identifier = Some(option_flag(value));
            }
        } else {
            converted.options.insert(name.clone(), value.clone());
        }
    }
}

fn option_flag(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(text) => text != "false",
        Value::Null => false,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(map: &RelationshipMap, entity: &str) -> JsonRelationship {
        let relationships = &map[entity];
        assert_eq!(relationships.len(), 1, "expected one relationship on {}", entity);
        relationships[0].clone()
    }

    #[test]
    fn test_extract_field() {
        assert_eq!(
            extract_field("job(title)"),
            InjectedField {
                relationship_name: "job",
                other_entity_field: Some("title"),
            }
        );
        assert_eq!(
            extract_field("job"),
            InjectedField {
                relationship_name: "job",
                other_entity_field: None,
            }
        );
        assert_eq!(extract_field("job()").other_entity_field, None);
    }

    #[test]
    fn test_built_in_entities() {
        assert!(is_built_in_entity("User"));
        assert!(is_built_in_entity("authority"));
        assert!(!is_built_in_entity("UserProfile"));
    }

    #[test]
    fn test_empty_input_still_registers_entities() {
        let map = convert_relationships(&[], &["A", "B"]);
        assert_eq!(map.len(), 2);
        assert!(map["A"].is_empty());
    }

    #[test]
    fn test_one_to_one_owner_and_inverse() {
        let relationship = JdlRelationship::new("Car", "Engine", RelationshipType::OneToOne)
            .with_injected_fields(Some("engine(serial)"), Some("car"));

        let map = convert_relationships(&[relationship], &["Car", "Engine"]);
        let car = single(&map, "Car");
        let engine = single(&map, "Engine");

        assert_eq!(car.relationship_type, RelationshipType::OneToOne);
        assert_eq!(car.relationship_name, "engine");
        assert_eq!(car.other_entity_name, "engine");
        assert_eq!(car.other_entity_field, "serial");
        assert_eq!(car.other_entity_relationship_name, "car");
        assert_eq!(car.owner_side, Some(true));

        assert_eq!(engine.relationship_type, RelationshipType::OneToOne);
        assert_eq!(engine.relationship_name, "car");
        assert_eq!(engine.other_entity_name, "car");
        assert_eq!(engine.other_entity_field, "id");
        assert_eq!(engine.other_entity_relationship_name, "engine");
        assert_eq!(engine.owner_side, Some(false));
    }

    #[test]
    fn test_one_to_one_without_injected_fields() {
        let relationship = JdlRelationship::new("Car", "Engine", RelationshipType::OneToOne);

        let map = convert_relationships(&[relationship], &["Car", "Engine"]);
        let car = single(&map, "Car");

        assert_eq!(car.relationship_name, "engine");
        assert_eq!(car.other_entity_field, "id");
        assert_eq!(car.other_entity_relationship_name, "car");
        assert!(map["Engine"].is_empty());
    }

    #[test]
    fn test_one_to_many_inverse_is_many_to_one() {
        let relationship = JdlRelationship::new("Department", "Employee", RelationshipType::OneToMany)
            .with_injected_fields(Some("employee"), Some("department(name)"));

        let map = convert_relationships(&[relationship], &["Department", "Employee"]);
        let department = single(&map, "Department");
        let employee = single(&map, "Employee");

        assert_eq!(department.relationship_type, RelationshipType::OneToMany);
        assert_eq!(department.owner_side, None);
        assert_eq!(employee.relationship_type, RelationshipType::ManyToOne);
        assert_eq!(employee.other_entity_field, "name");
        assert_eq!(employee.owner_side, None);
    }

    #[test]
    fn test_many_to_one_from_side_always_emitted() {
        let relationship = JdlRelationship::new("Employee", "Job", RelationshipType::ManyToOne);

        let map = convert_relationships(&[relationship], &["Employee", "Job"]);
        let employee = single(&map, "Employee");

        assert_eq!(employee.relationship_type, RelationshipType::ManyToOne);
        assert_eq!(employee.relationship_name, "job");
        assert_eq!(employee.owner_side, None);
        assert!(map["Job"].is_empty());
    }

    #[test]
    fn test_many_to_one_inverse_is_one_to_many() {
        let relationship = JdlRelationship::new("Employee", "Job", RelationshipType::ManyToOne)
            .with_injected_fields(Some("job"), Some("employee"));

        let map = convert_relationships(&[relationship], &["Employee", "Job"]);
        assert_eq!(
            single(&map, "Job").relationship_type,
            RelationshipType::OneToMany
        );
    }

    #[test]
    fn test_many_to_many_synthesizes_inverse() {
        let relationship = JdlRelationship::new("Job", "Task", RelationshipType::ManyToMany)
            .with_injected_fields(Some("task(title)"), None);

        let map = convert_relationships(&[relationship], &["Job", "Task"]);
        let job = single(&map, "Job");
        let task = single(&map, "Task");

        assert_eq!(job.owner_side, Some(true));
        assert_eq!(job.relationship_name, "task");
        assert_eq!(job.other_entity_field, "title");

        assert_eq!(task.relationship_type, RelationshipType::ManyToMany);
        assert_eq!(task.relationship_name, "job");
        assert_eq!(task.other_entity_name, "job");
        assert_eq!(task.other_entity_relationship_name, "task");
        assert_eq!(task.owner_side, Some(false));
    }

    #[test]
    fn test_many_to_many_to_built_in_has_no_inverse() {
        let relationships = vec![
            JdlRelationship::new("Team", "User", RelationshipType::ManyToMany),
            JdlRelationship::new("Role", "Authority", RelationshipType::ManyToMany),
        ];

        let map = convert_relationships(&relationships, &["Team", "Role", "User", "Authority"]);
        assert_eq!(single(&map, "Team").owner_side, Some(true));
        assert_eq!(single(&map, "Role").owner_side, Some(true));
        assert!(map["User"].is_empty());
        assert!(map["Authority"].is_empty());
    }

    #[test]
    fn test_required_and_comments_stay_on_their_side() {
        let mut relationship = JdlRelationship::new("Order", "Customer", RelationshipType::ManyToOne)
            .with_injected_fields(Some("customer"), Some("order"));
        relationship.is_injected_field_in_from_required = true;
        relationship.comment_in_to = Some("/** Orders placed */".to_string());

        let map = convert_relationships(&[relationship], &["Order", "Customer"]);
        let order = single(&map, "Order");
        let customer = single(&map, "Customer");

        assert_eq!(order.relationship_validate_rules.as_deref(), Some("required"));
        assert_eq!(order.javadoc, None);
        assert_eq!(customer.relationship_validate_rules, None);
        assert_eq!(customer.javadoc.as_deref(), Some("Orders placed"));
    }

    #[test]
    fn test_jpa_derived_identifier_only_on_owner_side() {
        let relationship = JdlRelationship::new("Profile", "Account", RelationshipType::OneToOne)
            .with_injected_fields(Some("account"), Some("profile"))
            .with_option(JPA_DERIVED_IDENTIFIER, Value::Bool(true))
            .with_option("onDelete", Value::from("cascade"));

        let map = convert_relationships(&[relationship], &["Profile", "Account"]);
        let profile = single(&map, "Profile");
        let account = single(&map, "Account");

        assert_eq!(profile.use_jpa_derived_identifier, Some(true));
        assert!(!profile.options.contains_key(JPA_DERIVED_IDENTIFIER));
        assert_eq!(profile.options["onDelete"], Value::from("cascade"));

        assert_eq!(account.use_jpa_derived_identifier, None);
        assert_eq!(account.options["onDelete"], Value::from("cascade"));
    }

    #[test]
    fn test_jpa_derived_identifier_ignored_when_not_owner() {
        let relationship = JdlRelationship::new("A", "B", RelationshipType::OneToMany)
            .with_option(JPA_DERIVED_IDENTIFIER, Value::Bool(true));

        let map = convert_relationships(&[relationship], &["A", "B"]);
        let a = single(&map, "A");
        assert_eq!(a.use_jpa_derived_identifier, None);
        assert!(a.options.is_empty());
    }

    #[test]
    fn test_jpa_derived_identifier_not_copied_to_synthesized_inverse() {
        let relationship = JdlRelationship::new("Job", "Task", RelationshipType::ManyToMany)
            .with_injected_fields(Some("task"), None)
            .with_option(JPA_DERIVED_IDENTIFIER, Value::Bool(true));

        let map = convert_relationships(&[relationship], &["Job", "Task"]);
        let job = single(&map, "Job");
        let task = single(&map, "Task");

        assert_eq!(job.owner_side, Some(true));
        assert_eq!(job.use_jpa_derived_identifier, Some(true));

        assert_eq!(task.owner_side, Some(false));
        assert_eq!(task.use_jpa_derived_identifier, None);
        assert!(!task.options.contains_key(JPA_DERIVED_IDENTIFIER));
    }

    #[test]
    fn test_reflexive_relationship() {
        let relationship = JdlRelationship::new("Employee", "Employee", RelationshipType::ManyToOne)
            .with_injected_fields(Some("manager"), Some("report"));

        let map = convert_relationships(&[relationship], &["Employee"]);
        let relationships = &map["Employee"];

        assert_eq!(relationships.len(), 2);
        assert_eq!(relationships[0].relationship_name, "manager");
        assert_eq!(relationships[0].relationship_type, RelationshipType::ManyToOne);
        assert_eq!(relationships[1].relationship_name, "report");
        assert_eq!(relationships[1].relationship_type, RelationshipType::OneToMany);
    }

    #[test]
    fn test_undeclared_target_is_dropped() {
        let relationship = JdlRelationship::new("Job", "Ghost", RelationshipType::ManyToMany);

        let map = convert_relationships(&[relationship], &["Job"]);
        assert_eq!(map.len(), 1);
        assert_eq!(map["Job"].len(), 1);
    }
}
