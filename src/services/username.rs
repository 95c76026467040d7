//! Author name resolution
//!
//! Maps the author id stored on a revision to something a person can read.
//! Every path ends in a string; lookup problems never fail the caller.

use tracing::{debug, warn};

use crate::models::{UserId, UNKNOWN_AUTHOR};
use crate::storage::UserDirectory;

/// Resolves author ids to display names
pub struct UsernameResolver<'a> {
    directory: &'a dyn UserDirectory,
}

impl<'a> UsernameResolver<'a> {
    pub fn new(directory: &'a dyn UserDirectory) -> Self {
        Self { directory }
    }

    /// Display name for an author
    ///
    /// Tries the username, then the system id, then falls back to `"Unknown"`.
    pub fn resolve_display_name(&self, author_id: Option<UserId>) -> String {
        let Some(id) = author_id else {
            return UNKNOWN_AUTHOR.to_string();
        };

        match self.directory.get_user(id) {
            Ok(Some(profile)) => profile
                .display_name()
                .map(str::to_string)
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            Ok(None) => {
                debug!(user_id = %id, "Author not found in user directory");
                UNKNOWN_AUTHOR.to_string()
            }
            Err(e) => {
                warn!(user_id = %id, error = %e, "User directory lookup failed");
                UNKNOWN_AUTHOR.to_string()
            }
        }
    }
}
