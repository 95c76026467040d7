//! User profiles as returned by a user directory

use serde::{Deserialize, Serialize};

use super::ids::UserId;

/// A user known to the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,

    /// Primary display handle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Secondary, system-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_id: Option<String>,
}

impl UserProfile {
    pub fn new(id: UserId, username: Option<String>, system_id: Option<String>) -> Self {
        Self {
            id,
            username,
            system_id,
        }
    }

    /// The best available non-empty name, handle first
    pub fn display_name(&self) -> Option<&str> {
        non_empty(self.username.as_deref()).or_else(|| non_empty(self.system_id.as_deref()))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
