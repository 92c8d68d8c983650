//! Entity skeletons: name, table name, javadoc and default options

use crate::models::{JdlEntity, JdlObject, JsonEntity};
use crate::utils::{camel_case, format_comment, snake_case, upper_first};
use std::collections::BTreeMap;

/// Build one defaulted `JsonEntity` per declared entity, keyed by JDL name
pub fn convert_basic_entities(jdl: &JdlObject) -> BTreeMap<String, JsonEntity> {
    jdl.entities
        .iter()
        .map(|entity| (entity.name.clone(), convert_entity(entity)))
        .collect()
}

fn convert_entity(entity: &JdlEntity) -> JsonEntity {
    let mut json_entity = JsonEntity::new(
        entity_name(&entity.name),
        snake_case(entity.table_name_or_default()),
    );
    json_entity.javadoc = entity.comment.as_deref().and_then(format_comment);
    json_entity
}

/// Normalized entity class name: `job_history` and `jobHistory` both give `JobHistory`
pub fn entity_name(name: &str) -> String {
    upper_first(&camel_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_entity_defaults() {
        let mut jdl = JdlObject::new();
        jdl.add_entity(JdlEntity::new("JobHistory").with_comment("/** Job history. */"));

        let entities = convert_basic_entities(&jdl);
        let entity = &entities["JobHistory"];

        assert_eq!(entity.name, "JobHistory");
        assert_eq!(entity.entity_table_name, "job_history");
        assert_eq!(entity.javadoc.as_deref(), Some("Job history."));
        assert!(entity.fields.is_empty());
        assert!(entity.relationships.is_empty());
        assert!(entity.fluent_methods);
    }

    #[test]
    fn test_explicit_table_name_is_snake_cased() {
        let mut jdl = JdlObject::new();
        jdl.add_entity(JdlEntity::new("Employee").with_table_name("StaffMember"));

        let entities = convert_basic_entities(&jdl);
        assert_eq!(entities["Employee"].entity_table_name, "staff_member");
    }

    #[test]
    fn test_entity_name_normalization() {
        assert_eq!(entity_name("job_history"), "JobHistory");
        assert_eq!(entity_name("jobHistory"), "JobHistory");
        assert_eq!(entity_name("Region"), "Region");
    }
}
