//! User settings for revtrail
//!
//! Holds the audited type list (with optional field schemas), the default
//! page size for listings, and the fallback log filter.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::paths::AuditPaths;
use crate::audit::{EntitySchema, FieldSpec};
use crate::error::AuditError;

/// An entity type whose history is tracked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditedType {
    /// Type identifier, e.g. a fully qualified class name
    pub name: String,

    /// Declared fields in declaration order; empty means infer from snapshots
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldSpec>,
}

impl AuditedType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_fields(name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// The configured schema, if any fields were declared
    pub fn schema(&self) -> Option<EntitySchema> {
        if self.fields.is_empty() {
            None
        } else {
            Some(EntitySchema::new(self.fields.clone()))
        }
    }
}

/// User settings for revtrail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Page size used when a listing does not ask for one
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// `tracing` filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Entity types whose revisions may be queried
    #[serde(default)]
    pub audited_types: Vec<AuditedType>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_page_size() -> usize {
    20
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_page_size: default_page_size(),
            log_filter: default_log_filter(),
            audited_types: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &AuditPaths) -> Result<Self, AuditError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| AuditError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                AuditError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &AuditPaths) -> Result<(), AuditError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| AuditError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| AuditError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Check the settings for values the services cannot work with
    pub fn validate(&self) -> Result<(), AuditError> {
        if self.default_page_size == 0 {
            return Err(AuditError::Config(
                "default_page_size must be greater than zero".into(),
            ));
        }

        let mut seen = HashSet::new();
        for audited in &self.audited_types {
            let name = audited.name.trim();
            if name.is_empty() {
                return Err(AuditError::Config("audited type name cannot be empty".into()));
            }
            if !seen.insert(name) {
                return Err(AuditError::Config(format!(
                    "audited type listed twice: {}",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Add a type to the audited list unless it is already there
    pub fn add_audited_type(&mut self, audited: AuditedType) -> bool {
        if self.audited_types.iter().any(|t| t.name == audited.name) {
            return false;
        }
        self.audited_types.push(audited);
        true
    }
}
