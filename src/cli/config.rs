//! Conversion settings for the CLI
//!
//! Settings are resolved with the following precedence, highest first:
//! command-line flags, the TOML config file, the first `application` block of
//! the JDL, built-in defaults (`sql`, monolith).

use super::CliError;
use crate::convert::ConversionConfig;
use crate::models::{ApplicationType, DatabaseType, JdlObject};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Contents of a `--config` TOML file
///
/// ```toml
/// application_name = "store"
/// database_type = "sql"
/// application_type = "microservice"
/// creation_timestamp = "2024-01-15T10:00:00Z"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub application_name: Option<String>,
    pub database_type: Option<String>,
    pub application_type: Option<String>,
    pub creation_timestamp: Option<String>,
}

impl FileConfig {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn load(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::FileReadError(path.to_path_buf(), e.to_string()))?;
        Self::from_toml(&content)
            .map_err(|e| CliError::ConfigError(path.to_path_buf(), e.to_string()))
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub application_name: Option<String>,
    pub database_type: Option<String>,
    pub application_type: Option<String>,
    pub creation_timestamp: Option<String>,
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, CliError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| CliError::InvalidArgument(format!("Invalid timestamp '{}': {}", value, e)))
}

/// Resolve the conversion configuration for `jdl`
pub fn resolve_config(
    overrides: &ConfigOverrides,
    file: &FileConfig,
    jdl: &JdlObject,
) -> Result<ConversionConfig, CliError> {
    let application = jdl.applications.first();

    let application_name = overrides
        .application_name
        .clone()
        .or_else(|| file.application_name.clone())
        .or_else(|| application.map(|app| app.base_name.clone()))
        .ok_or_else(|| {
            CliError::InvalidArgument(
                "No application name: pass --app-name or declare an application".to_string(),
            )
        })?;

    let database_type: DatabaseType = overrides
        .database_type
        .as_deref()
        .or(file.database_type.as_deref())
        .or_else(|| application.and_then(|app| app.config_str("databaseType")))
        .unwrap_or("sql")
        .parse()
        .map_err(CliError::InvalidArgument)?;

    let application_type: ApplicationType = overrides
        .application_type
        .as_deref()
        .or(file.application_type.as_deref())
        .or_else(|| application.and_then(|app| app.config_str("applicationType")))
        .unwrap_or("monolith")
        .parse()
        .map_err(CliError::InvalidArgument)?;

    let mut builder = ConversionConfig::builder()
        .application_name(application_name)
        .database_type(database_type)
        .application_type(application_type);

    if let Some(timestamp) = overrides
        .creation_timestamp
        .as_deref()
        .or(file.creation_timestamp.as_deref())
    {
        builder = builder.creation_timestamp(parse_timestamp(timestamp)?);
    }

    let config = builder.build()?;
    debug!("Resolved conversion config: {:?}", config);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JdlApplication;

    #[test]
    fn test_file_config_from_toml() {
        let config = FileConfig::from_toml(
            "application_name = \"store\"\ndatabase_type = \"mongodb\"\n",
        )
        .unwrap();
        assert_eq!(config.application_name.as_deref(), Some("store"));
        assert_eq!(config.database_type.as_deref(), Some("mongodb"));
        assert!(config.application_type.is_none());
    }

    #[test]
    fn test_file_config_rejects_unknown_keys() {
        assert!(FileConfig::from_toml("colour = \"blue\"").is_err());
    }

    #[test]
    fn test_flags_override_file_and_application() {
        let mut jdl = JdlObject::new();
        let mut app = JdlApplication::new("fromJdl");
        app.config
            .insert("databaseType".to_string(), serde_json::Value::from("cassandra"));
        jdl.add_application(app);

        let file = FileConfig {
            application_name: Some("fromFile".to_string()),
            ..Default::default()
        };
        let overrides = ConfigOverrides {
            application_type: Some("gateway".to_string()),
            ..Default::default()
        };

        let config = resolve_config(&overrides, &file, &jdl).unwrap();
        assert_eq!(config.application_name, "fromFile");
        assert_eq!(config.database_type, DatabaseType::Cassandra);
        assert_eq!(config.application_type, ApplicationType::Gateway);
    }

    #[test]
    fn test_defaults() {
        let overrides = ConfigOverrides {
            application_name: Some("app".to_string()),
            creation_timestamp: Some("2024-01-15T11:00:00+01:00".to_string()),
            ..Default::default()
        };
        let config = resolve_config(&overrides, &FileConfig::default(), &JdlObject::new()).unwrap();
        assert_eq!(config.database_type, DatabaseType::Sql);
        assert_eq!(config.application_type, ApplicationType::Monolith);
        assert_eq!(
            config.creation_timestamp.unwrap().to_rfc3339(),
            "2024-01-15T10:00:00+00:00"
        );
    }

    #[test]
    fn test_missing_name_and_bad_values() {
        let err = resolve_config(&ConfigOverrides::default(), &FileConfig::default(), &JdlObject::new())
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument(_)));

        let overrides = ConfigOverrides {
            application_name: Some("app".to_string()),
            database_type: Some("oracle-ish".to_string()),
            ..Default::default()
        };
        assert!(resolve_config(&overrides, &FileConfig::default(), &JdlObject::new()).is_err());
        assert!(parse_timestamp("yesterday").is_err());
    }
}
