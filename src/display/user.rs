//! User list formatting

use super::truncate;
use crate::models::{UserProfile, UNKNOWN_AUTHOR};

/// Format the user directory as a table
pub fn format_user_list(users: &[UserProfile]) -> String {
    if users.is_empty() {
        return "No users found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:>8}  {:<20}  {:<20}  {}\n",
        "ID", "Username", "System ID", "Shown As"
    ));
    output.push_str(&format!("{:-<8}  {:-<20}  {:-<20}  {:-<20}\n", "", "", "", ""));

    for user in users {
        output.push_str(&format!(
            "{:>8}  {:<20}  {:<20}  {}\n",
            user.id.to_string(),
            truncate(user.username.as_deref().unwrap_or("-"), 20),
            truncate(user.system_id.as_deref().unwrap_or("-"), 20),
            user.display_name().unwrap_or(UNKNOWN_AUTHOR)
        ));
    }

    output
}
