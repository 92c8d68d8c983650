//! JDL-to-JSON conversion
//!
//! Turns a parsed [`JdlObject`] into the JSON entity configurations consumed by
//! the template generators:
//! 1. entity skeletons (table name, javadoc, defaults)
//! 2. entity options
//! 3. fields
//! 4. relationships
//! 5. owning applications
//!
//! The conversion is a pure function of its inputs: converting the same
//! object twice yields equal maps.

pub mod basic_entity;
pub mod config;
pub mod fields;
pub mod options;
pub mod relationships;

pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use relationships::{RelationshipMap, convert_relationships, is_built_in_entity};

use crate::models::{JdlObject, JsonEntity};
use chrono::Duration;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Format of `changelogDate`
pub const CHANGELOG_DATE_FORMAT: &str = "%Y%m%d%H%M%S";

/// Error during conversion
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),
    #[error("Unrecognised blob type: '{0}'")]
    UnrecognizedBlobType(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Converted entities keyed by JDL entity name
pub type EntityMap = BTreeMap<String, JsonEntity>;

/// Convert every entity of `jdl` using the given application metadata
pub fn convert(jdl: &JdlObject, config: &ConversionConfig) -> Result<EntityMap, ConversionError> {
    JdlToJsonConverter::new(config.clone()).convert(jdl)
}

/// Convert once per `application` block, each with its own configuration and entities.
///
/// Returns a map of application base name to its converted entities.
pub fn convert_applications(
    jdl: &JdlObject,
) -> Result<BTreeMap<String, EntityMap>, ConversionError> {
    let mut per_application = BTreeMap::new();
    for application in &jdl.applications {
        let config = ConversionConfig::for_application(application)?;
        let mut entities = convert(jdl, &config)?;
        entities.retain(|name, _| application.includes(name));
        per_application.insert(application.base_name.clone(), entities);
    }
    Ok(per_application)
}

/// Orchestrates the converters over a whole JDL object
#[derive(Debug, Clone)]
pub struct JdlToJsonConverter {
    config: ConversionConfig,
}

impl JdlToJsonConverter {
    pub fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn convert(&self, jdl: &JdlObject) -> Result<EntityMap, ConversionError> {
        self.config.validate()?;
        info!(
            "Converting {} entities for application {}",
            jdl.entities.len(),
            self.config.application_name
        );

        let mut entities = basic_entity::convert_basic_entities(jdl);
        options::apply_options(jdl, &mut entities, &self.config);
        self.set_fields(jdl, &mut entities)?;
        self.set_relationships(jdl, &mut entities);
        self.set_changelog_dates(jdl, &mut entities)?;
        self.set_applications(jdl, &mut entities);

        Ok(entities)
    }

    fn set_fields(&self, jdl: &JdlObject, entities: &mut EntityMap) -> Result<(), ConversionError> {
        for (entity_name, fields) in fields::convert_fields(jdl)? {
            if let Some(entity) = entities.get_mut(&entity_name) {
                debug!("{}: {} fields", entity_name, fields.len());
                entity.fields = fields;
            }
        }
        Ok(())
    }

    fn set_relationships(&self, jdl: &JdlObject, entities: &mut EntityMap) {
        let entity_names = jdl.entity_names();
        for (entity_name, relationships) in
            relationships::convert_relationships(&jdl.relationships, &entity_names)
        {
            if let Some(entity) = entities.get_mut(&entity_name) {
                debug!("{}: {} relationships", entity_name, relationships.len());
                entity.relationships = relationships;
            }
        }
    }

    /// One second apart per entity, in declaration order
    fn set_changelog_dates(
        &self,
        jdl: &JdlObject,
        entities: &mut EntityMap,
    ) -> Result<(), ConversionError> {
        let Some(timestamp) = self.config.creation_timestamp else {
            return Ok(());
        };
        for (index, jdl_entity) in jdl.entities.iter().enumerate() {
            if let Some(entity) = entities.get_mut(&jdl_entity.name) {
                let date = timestamp
                    .checked_add_signed(Duration::seconds(index as i64))
                    .ok_or_else(|| {
                        ConversionError::InvalidConfig(format!(
                            "creation timestamp {} leaves no room for {} changelog dates",
                            timestamp,
                            jdl.entities.len()
                        ))
                    })?;
                entity.changelog_date = Some(date.format(CHANGELOG_DATE_FORMAT).to_string());
            }
        }
        Ok(())
    }

    fn set_applications(&self, jdl: &JdlObject, entities: &mut EntityMap) {
        for (entity_name, entity) in entities.iter_mut() {
            let applications: Vec<String> = jdl
                .applications_for_entity(entity_name)
                .into_iter()
                .map(|app| app.base_name.clone())
                .collect();
            entity.applications = if applications.is_empty() {
                vec![self.config.application_name.clone()]
            } else {
                applications
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        DatabaseType, EntitySelection, JdlApplication, JdlEntity, JdlField, JdlRelationship,
        RelationshipType,
    };
    use chrono::{DateTime, TimeZone, Utc};

    fn sample_jdl() -> JdlObject {
        let mut jdl = JdlObject::new();
        jdl.add_entity(JdlEntity::new("Job").with_field(JdlField::new("title", "String")));
        jdl.add_entity(JdlEntity::new("Task").with_field(JdlField::new("name", "String")));
        jdl.add_relationship(
            JdlRelationship::new("Job", "Task", RelationshipType::ManyToMany)
                .with_injected_fields(Some("task"), Some("job")),
        );
        jdl
    }

    #[test]
    fn test_convert_sequences_all_steps() {
        let config = ConversionConfig::new("jobs", DatabaseType::Sql);
        let entities = convert(&sample_jdl(), &config).unwrap();

        assert_eq!(entities.len(), 2);
        let job = &entities["Job"];
        assert_eq!(job.fields[0].field_name, "title");
        assert_eq!(job.relationships.len(), 1);
        assert_eq!(job.applications, vec!["jobs"]);
        assert!(job.changelog_date.is_none());
    }

    #[test]
    fn test_convert_requires_application_name() {
        let config = ConversionConfig::new("", DatabaseType::Sql);
        let err = convert(&sample_jdl(), &config).unwrap_err();
        assert!(matches!(err, ConversionError::MissingArgument(_)));
    }

    #[test]
    fn test_changelog_dates_are_sequential() {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let config =
            ConversionConfig::new("jobs", DatabaseType::Sql).with_creation_timestamp(timestamp);

        let entities = convert(&sample_jdl(), &config).unwrap();
        assert_eq!(
            entities["Job"].changelog_date.as_deref(),
            Some("20240115100000")
        );
        assert_eq!(
            entities["Task"].changelog_date.as_deref(),
            Some("20240115100001")
        );
    }

    #[test]
    fn test_changelog_date_overflow_is_an_error() {
        let config = ConversionConfig::new("jobs", DatabaseType::Sql)
            .with_creation_timestamp(DateTime::<Utc>::MAX_UTC);

        let err = convert(&sample_jdl(), &config).unwrap_err();
        assert!(matches!(err, ConversionError::InvalidConfig(_)));
    }

    #[test]
    fn test_applications_from_jdl() {
        let mut jdl = sample_jdl();
        let mut app = JdlApplication::new("jobBoard");
        app.entity_names = EntitySelection::named(["Job"]);
        jdl.add_application(app);

        let config = ConversionConfig::new("fallback", DatabaseType::Sql);
        let entities = convert(&jdl, &config).unwrap();

        assert_eq!(entities["Job"].applications, vec!["jobBoard"]);
        assert_eq!(entities["Task"].applications, vec!["fallback"]);
    }

    #[test]
    fn test_convert_applications_filters_entities() {
        let mut jdl = sample_jdl();
        let mut first = JdlApplication::new("first");
        first.entity_names = EntitySelection::All;
        first.excluded_names = vec!["Task".to_string()];
        let mut second = JdlApplication::new("second");
        second.entity_names = EntitySelection::named(["Task"]);
        second
            .config
            .insert("databaseType".to_string(), serde_json::Value::from("mongodb"));
        jdl.add_application(first);
        jdl.add_application(second);

        let converted = convert_applications(&jdl).unwrap();
        assert_eq!(converted.len(), 2);
        assert_eq!(
            converted["first"].keys().collect::<Vec<_>>(),
            vec!["Job"]
        );
        assert_eq!(
            converted["second"].keys().collect::<Vec<_>>(),
            vec!["Task"]
        );
    }

    #[test]
    fn test_convert_is_idempotent() {
        let config = ConversionConfig::new("jobs", DatabaseType::Sql);
        let jdl = sample_jdl();
        assert_eq!(convert(&jdl, &config).unwrap(), convert(&jdl, &config).unwrap());
    }
}
