//! Display formatting for terminal output
//!
//! Formats revision pages, single revisions, field diffs and user lists as
//! plain text tables for the command line.

pub mod diff;
pub mod revision;
pub mod user;

pub use diff::format_revision_diff;
pub use revision::{format_revision_details, format_revision_page, format_type_list};
pub use user::format_user_list;

/// Shorten `s` to at most `max_len` characters, marking the cut with `...`
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
