//! Field diff display formatting

use super::truncate;
use crate::audit::summarize_changes;
use crate::models::{FieldDiff, RevisionDiff};

const VALUE_WIDTH: usize = 30;

/// Format field diffs as a table; changed rows are marked with `*`
pub fn format_field_diffs(diffs: &[FieldDiff]) -> String {
    if diffs.is_empty() {
        return "No fields to compare.\n".to_string();
    }

    let name_width = diffs
        .iter()
        .map(|d| d.field_name.chars().count())
        .max()
        .unwrap_or(5)
        .max(5);

    let mut output = String::new();
    output.push_str(&format!(
        "  {:<name_width$}  {:<value_width$}  {}\n",
        "Field",
        "Old",
        "Current",
        name_width = name_width,
        value_width = VALUE_WIDTH,
    ));
    output.push_str(&format!(
        "  {:-<name_width$}  {:-<value_width$}  {:-<value_width$}\n",
        "",
        "",
        "",
        name_width = name_width,
        value_width = VALUE_WIDTH,
    ));

    for diff in diffs {
        let marker = if diff.changed { "*" } else { " " };
        let old = diff.old_value.as_deref().unwrap_or("(none)");
        output.push_str(&format!(
            "{} {:<name_width$}  {:<value_width$}  {}\n",
            marker,
            diff.field_name,
            truncate(old, VALUE_WIDTH),
            truncate(&diff.current_value, VALUE_WIDTH),
            name_width = name_width,
            value_width = VALUE_WIDTH,
        ));
    }

    output
}

/// Format a revision diff with a header naming both revisions
pub fn format_revision_diff(diff: &RevisionDiff) -> String {
    let mut output = String::new();

    let against = diff
        .previous_revision
        .map(|r| r.to_string())
        .unwrap_or_else(|| "(first revision)".to_string());

    output.push_str(&format!(
        "{} {}: {} ({}) by {}, compared with {}\n\n",
        diff.entity_type,
        diff.revision.entity_id,
        diff.revision.revision_number,
        diff.revision.change_kind,
        diff.revision.author_display_name,
        against
    ));
    output.push_str(&format_field_diffs(&diff.fields));

    let changed = diff.changed_fields().count();
    output.push_str(&format!(
        "\n{} of {} fields changed\n",
        changed,
        diff.fields.len()
    ));
    if let Some(summary) = summarize_changes(&diff.fields) {
        output.push_str(&format!("Changes: {}\n", summary));
    }

    output
}
