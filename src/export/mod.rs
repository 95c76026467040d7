//! Export module for revtrail
//!
//! Writes the full revision history of one entity type to a file:
//! - JSON: machine-readable, pretty printed
//! - YAML: human-readable, with a header comment

pub mod json;
pub mod yaml;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{AuditError, AuditResult};
use crate::models::Revision;
use crate::services::RevisionService;

pub use json::export_revisions_json;
pub use yaml::export_revisions_yaml;

/// Page size used when walking the history for an export
const EXPORT_PAGE_SIZE: usize = 500;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Pretty-printed JSON
    Json,
    /// YAML with a comment header
    Yaml,
}

impl ExportFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(AuditError::Validation(format!(
                "Unknown export format: {} (expected json or yaml)",
                other
            ))),
        }
    }
}

/// Full revision history of one entity type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevisionExport {
    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub entity_type: String,

    /// Revision count reported by the store
    pub total_count: u64,

    /// Every revision, newest first
    pub revisions: Vec<Revision>,
}

impl RevisionExport {
    /// Collect every revision of `entity_type` through the service
    ///
    /// Unaudited types produce an export with no revisions.
    pub fn collect(service: &RevisionService<'_>, entity_type: &str) -> AuditResult<Self> {
        let mut revisions = Vec::new();
        let mut page_index = 0;
        let mut total_count = 0;

        loop {
            let page = service.list_revisions(entity_type, page_index, EXPORT_PAGE_SIZE)?;
            total_count = page.total_count;
            let has_next = page.has_next();
            revisions.extend(page.items);

            if !has_next {
                break;
            }
            page_index += 1;
        }

        Ok(Self {
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            entity_type: entity_type.to_string(),
            total_count,
            revisions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::AuditPaths;
    use crate::models::{ChangeKind, EntityId};
    use crate::storage::{StaticTypeRegistry, Storage};
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_format_parsing() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("YML".parse::<ExportFormat>().unwrap(), ExportFormat::Yaml);
        assert!("csv".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Yaml.to_string(), "yaml");
    }

    #[test]
    fn test_collect_walks_every_page() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AuditPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        for i in 0..3 {
            storage
                .revisions
                .record(
                    "org.example.Patient",
                    EntityId::new(1),
                    ChangeKind::Modify,
                    None,
                    json!({"n": i}),
                )
                .unwrap();
        }

        let registry = StaticTypeRegistry::from_names(["org.example.Patient"]);
        let service = RevisionService::new(&storage.revisions, &registry, &storage.users);

        let export = RevisionExport::collect(&service, "org.example.Patient").unwrap();
        assert_eq!(export.total_count, 3);
        assert_eq!(export.revisions.len(), 3);
        assert_eq!(export.revisions[0].snapshot, json!({"n": 2}));

        let empty = RevisionExport::collect(&service, "non.existent.Type").unwrap();
        assert_eq!(empty.total_count, 0);
        assert!(empty.revisions.is_empty());
    }
}
