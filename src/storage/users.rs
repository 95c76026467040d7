//! User directory for JSON storage
//!
//! Manages loading and saving user profiles to users.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{AuditError, AuditResult};
use crate::models::{UserId, UserProfile};

use super::file_io::{read_json, write_json_atomic};
use super::traits::UserDirectory;

/// Serializable user data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct UserData {
    users: Vec<UserProfile>,
}

/// Directory of revision authors
pub struct JsonUserDirectory {
    path: PathBuf,
    data: RwLock<HashMap<UserId, UserProfile>>,
}

impl JsonUserDirectory {
    /// Create a new user directory
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load users from disk
    pub fn load(&self) -> AuditResult<()> {
        let file_data: UserData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| AuditError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for user in file_data.users {
            data.insert(user.id, user);
        }

        Ok(())
    }

    /// Save users to disk
    pub fn save(&self) -> AuditResult<()> {
        let data = self
            .data
            .read()
            .map_err(|e| AuditError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut users: Vec<UserProfile> = data.values().cloned().collect();
        users.sort_by_key(|u| u.id);

        write_json_atomic(&self.path, &UserData { users })
    }

    /// Insert or update a user
    pub fn upsert(&self, user: UserProfile) -> AuditResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| AuditError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(user.id, user);
        Ok(())
    }

    /// Get all users ordered by id
    pub fn get_all(&self) -> AuditResult<Vec<UserProfile>> {
        let data = self
            .data
            .read()
            .map_err(|e| AuditError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut users: Vec<_> = data.values().cloned().collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }
}

impl UserDirectory for JsonUserDirectory {
    fn get_user(&self, id: UserId) -> AuditResult<Option<UserProfile>> {
        let data = self
            .data
            .read()
            .map_err(|e| AuditError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }
}
