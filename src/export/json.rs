//! JSON entity exporter

use super::{ExportError, ExportResult};
use crate::models::JsonEntity;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Directory, relative to the project root, that holds entity configurations
pub const JHIPSTER_DIRECTORY: &str = ".jhipster";

/// Exporter for `.jhipster/<Entity>.json` documents
#[derive(Debug, Default)]
pub struct JsonEntityExporter;

impl JsonEntityExporter {
    /// Create a new JSON entity exporter
    pub fn new() -> Self {
        Self
    }

    /// Render one entity as pretty-printed JSON
    pub fn export_entity(&self, entity: &JsonEntity) -> Result<ExportResult, ExportError> {
        let content = serde_json::to_string_pretty(entity)?;
        Ok(ExportResult {
            content,
            format: "json".to_string(),
        })
    }

    /// Render every entity into one JSON object keyed by entity name
    pub fn export_all(
        &self,
        entities: &BTreeMap<String, JsonEntity>,
    ) -> Result<ExportResult, ExportError> {
        let content = serde_json::to_string_pretty(entities)?;
        Ok(ExportResult {
            content,
            format: "json".to_string(),
        })
    }

    /// Path of the configuration file for `entity` under `project_dir`
    pub fn entity_path(&self, project_dir: &Path, entity: &JsonEntity) -> PathBuf {
        project_dir
            .join(JHIPSTER_DIRECTORY)
            .join(format!("{}.json", entity.name))
    }

    /// Write every entity to `<project_dir>/.jhipster/<Name>.json`, creating the
    /// directory when needed. Returns the written paths in entity-name order.
    pub fn write_to_directory(
        &self,
        entities: &BTreeMap<String, JsonEntity>,
        project_dir: &Path,
    ) -> Result<Vec<PathBuf>, ExportError> {
        let directory = project_dir.join(JHIPSTER_DIRECTORY);
        fs::create_dir_all(&directory).map_err(|e| {
            ExportError::IoError(format!("Failed to create {}: {}", directory.display(), e))
        })?;

        let mut written = Vec::with_capacity(entities.len());
        for entity in entities.values() {
            let path = self.entity_path(project_dir, entity);
            let result = self.export_entity(entity)?;
            fs::write(&path, format!("{}\n", result.content)).map_err(|e| {
                ExportError::IoError(format!("Failed to write {}: {}", path.display(), e))
            })?;
            written.push(path);
        }

        info!(
            "Wrote {} entity configurations to {}",
            written.len(),
            directory.display()
        );
        Ok(written)
    }
}
