//! Configuration for a JDL-to-JSON conversion run

use super::ConversionError;
use crate::models::{ApplicationType, DatabaseType, JdlApplication};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Application metadata the converter needs besides the JDL itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionConfig {
    /// Base name of the application owning the entities
    pub application_name: String,

    pub database_type: DatabaseType,

    #[serde(default)]
    pub application_type: ApplicationType,

    /// When set, entity *i* gets `changelogDate = timestamp + i seconds`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
}

impl ConversionConfig {
    pub fn new(application_name: impl Into<String>, database_type: DatabaseType) -> Self {
        Self {
            application_name: application_name.into(),
            database_type,
            application_type: ApplicationType::default(),
            creation_timestamp: None,
        }
    }

    /// Create a builder for custom configuration
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder::default()
    }

    /// Derive the configuration of a JDL `application` block.
    ///
    /// `databaseType` falls back to `sql` and `applicationType` to monolith,
    /// matching the generator defaults.
    pub fn for_application(application: &JdlApplication) -> Result<Self, ConversionError> {
        let database_type = match application.config_str("databaseType") {
            Some(value) => value.parse().map_err(ConversionError::InvalidConfig)?,
            None => DatabaseType::Sql,
        };
        let application_type = match application.config_str("applicationType") {
            Some(value) => value.parse().map_err(ConversionError::InvalidConfig)?,
            None => ApplicationType::Monolith,
        };

        ConversionConfig::builder()
            .application_name(&application.base_name)
            .database_type(database_type)
            .application_type(application_type)
            .build()
    }

    pub fn with_creation_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.creation_timestamp = Some(timestamp);
        self
    }

    /// Check the mandatory arguments
    pub fn validate(&self) -> Result<(), ConversionError> {
        if self.application_name.trim().is_empty() {
            return Err(ConversionError::MissingArgument("application name"));
        }
        Ok(())
    }
}

/// Builder for ConversionConfig
#[derive(Debug, Default)]
pub struct ConversionConfigBuilder {
    application_name: Option<String>,
    database_type: Option<DatabaseType>,
    application_type: ApplicationType,
    creation_timestamp: Option<DateTime<Utc>>,
}

impl ConversionConfigBuilder {
    pub fn application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    pub fn database_type(mut self, database_type: DatabaseType) -> Self {
        self.database_type = Some(database_type);
        self
    }

    pub fn application_type(mut self, application_type: ApplicationType) -> Self {
        self.application_type = application_type;
        self
    }

    pub fn creation_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.creation_timestamp = Some(timestamp);
        self
    }

    /// Build the configuration, failing when a mandatory argument is missing
    pub fn build(self) -> Result<ConversionConfig, ConversionError> {
        let application_name = self
            .application_name
            .ok_or(ConversionError::MissingArgument("application name"))?;
        let database_type = self
            .database_type
            .ok_or(ConversionError::MissingArgument("database type"))?;

        let config = ConversionConfig {
            application_name,
            database_type,
            application_type: self.application_type,
            creation_timestamp: self.creation_timestamp,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntitySelection;

    #[test]
    fn test_builder() {
        let config = ConversionConfig::builder()
            .application_name("store")
            .database_type(DatabaseType::Mongodb)
            .application_type(ApplicationType::Microservice)
            .build()
            .unwrap();

        assert_eq!(config.application_name, "store");
        assert_eq!(config.database_type, DatabaseType::Mongodb);
        assert_eq!(config.application_type, ApplicationType::Microservice);
        assert!(config.creation_timestamp.is_none());
    }

    #[test]
    fn test_builder_requires_database_type() {
        let err = ConversionConfig::builder()
            .application_name("store")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConversionError::MissingArgument("database type")));
    }

    #[test]
    fn test_builder_rejects_blank_application_name() {
        let err = ConversionConfig::builder()
            .application_name("  ")
            .database_type(DatabaseType::Sql)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConversionError::MissingArgument("application name")
        ));
    }

    #[test]
    fn test_config_from_application_block() {
        let mut app = JdlApplication::new("gateway");
        app.entity_names = EntitySelection::All;
        app.config.insert(
            "applicationType".to_string(),
            serde_json::Value::from("gateway"),
        );
        app.config
            .insert("databaseType".to_string(), serde_json::Value::from("neo4j"));

        let config = ConversionConfig::for_application(&app).unwrap();
        assert_eq!(config.application_name, "gateway");
        assert_eq!(config.database_type, DatabaseType::Neo4j);
        assert_eq!(config.application_type, ApplicationType::Gateway);
    }

    #[test]
    fn test_config_from_application_defaults_to_sql() {
        let app = JdlApplication::new("blog");
        let config = ConversionConfig::for_application(&app).unwrap();
        assert_eq!(config.database_type, DatabaseType::Sql);
        assert_eq!(config.application_type, ApplicationType::Monolith);
    }
}
