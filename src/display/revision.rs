//! Revision display formatting
//!
//! Register-style listings of revision pages and detail views of a single
//! revision.

use super::truncate;
use crate::models::{Revision, RevisionPage};

/// Format one listing row
pub fn format_revision_row(revision: &Revision) -> String {
    format!(
        "{:>8}  {:<6}  {:>10}  {:<20}  {}",
        revision.revision_number.to_string(),
        revision.change_kind.to_string(),
        revision.entity_id.to_string(),
        truncate(&revision.author_display_name, 20),
        revision.timestamp.format("%Y-%m-%d %H:%M:%S")
    )
}

/// Format a page of revisions as a table with a page footer
pub fn format_revision_page(page: &RevisionPage) -> String {
    if page.items.is_empty() {
        return format!(
            "No revisions found for {} (page {}, {} total).\n",
            page.entity_type,
            page.page_index + 1,
            page.total_count
        );
    }

    let mut output = String::new();
    output.push_str(&format!("Revisions of {}\n\n", page.entity_type));
    output.push_str(&format!(
        "{:>8}  {:<6}  {:>10}  {:<20}  {}\n",
        "Revision", "Kind", "Entity", "Author", "Timestamp (UTC)"
    ));
    output.push_str(&"-".repeat(72));
    output.push('\n');

    for revision in &page.items {
        output.push_str(&format_revision_row(revision));
        output.push('\n');
    }

    output.push_str(&format!(
        "\nPage {} of {} ({} revisions total)\n",
        page.page_index + 1,
        page.total_pages().max(1),
        page.total_count
    ));

    output
}

/// Format a single revision with its full snapshot
pub fn format_revision_details(entity_type: &str, revision: &Revision) -> String {
    let mut output = String::new();

    output.push_str(&format!("Entity:    {} {}\n", entity_type, revision.entity_id));
    output.push_str(&format!("Revision:  {}\n", revision.revision_number));
    output.push_str(&format!("Change:    {}\n", revision.change_kind));
    output.push_str(&format!("Author:    {}\n", revision.author_display_name));
    output.push_str(&format!(
        "Timestamp: {}\n",
        revision.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output.push_str("\nSnapshot:\n");
    let snapshot = serde_json::to_string_pretty(&revision.snapshot)
        .unwrap_or_else(|_| revision.snapshot.to_string());
    for line in snapshot.lines() {
        output.push_str("  ");
        output.push_str(line);
        output.push('\n');
    }

    output
}

/// Format the audited type list
pub fn format_type_list(types: &[String]) -> String {
    if types.is_empty() {
        return "No audited entity types configured.\n".to_string();
    }

    let mut output = String::new();
    for name in types {
        output.push_str(name);
        output.push('\n');
    }
    output.push_str(&format!("\nTotal: {} types\n", types.len()));
    output
}
