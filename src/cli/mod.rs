//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod export;
pub mod revision;
pub mod user;

pub use export::{handle_export_command, ExportArgs};
pub use revision::{handle_revision_command, handle_types_command, RevisionCommands};
pub use user::{handle_user_command, UserCommands};

use crate::config::Settings;
use crate::error::{AuditError, AuditResult};
use crate::storage::{CachedTypeRegistry, StaticTypeRegistry};

/// Type registry for the audited types listed in the settings
pub fn type_registry(settings: &Settings) -> CachedTypeRegistry<StaticTypeRegistry> {
    CachedTypeRegistry::new(StaticTypeRegistry::from_settings(settings))
}

/// Convert a 1-based page number from the command line to a page index
pub(crate) fn page_index(page: usize) -> AuditResult<usize> {
    page.checked_sub(1)
        .ok_or_else(|| AuditError::Validation("Page numbers start at 1".into()))
}
