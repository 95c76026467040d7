//! Storage layer for revtrail
//!
//! Defines the collaborator traits the query services depend on and the
//! file-backed implementations used by the command line tool: a JSON-lines
//! revision log, a JSON user directory and configured type registries.

pub mod file_io;
pub mod registry;
pub mod revisions;
pub mod traits;
pub mod users;

pub use file_io::{
    append_json_line, append_json_lines, read_json, read_json_lines, write_json_atomic,
};
pub use registry::{CachedTypeRegistry, StaticTypeRegistry};
pub use revisions::{EntityChange, JsonlRevisionStore};
pub use traits::{RevisionStore, TypeRegistry, UserDirectory};
pub use users::JsonUserDirectory;

use crate::config::paths::AuditPaths;
use crate::error::AuditError;

/// Main storage coordinator that owns the file-backed collaborators
pub struct Storage {
    paths: AuditPaths,
    pub revisions: JsonlRevisionStore,
    pub users: JsonUserDirectory,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: AuditPaths) -> Result<Self, AuditError> {
        paths.ensure_directories()?;

        Ok(Self {
            revisions: JsonlRevisionStore::new(paths.revisions_file()),
            users: JsonUserDirectory::new(paths.users_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &AuditPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), AuditError> {
        self.revisions.load()?;
        self.users.load()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AuditPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
        assert!(storage.revisions.is_empty().unwrap());
    }
}
