//! Field-by-field diffs between two snapshots
//!
//! Compares an old and a current snapshot of the same entity over an ordered
//! list of field names. Read failures never surface as changes.

use tracing::{debug, warn};

use super::reader::FieldSource;
use crate::models::FieldDiff;

/// Compute per-field differences between two snapshots
///
/// Returns an empty list when there is no current snapshot. Results follow
/// the order of `fields`. A field that fails to read on either side is
/// reported as unreadable and unchanged.
pub fn compute_field_diffs<S, F>(
    fields: &[F],
    old: Option<&S>,
    current: Option<&S>,
) -> Vec<FieldDiff>
where
    S: FieldSource + ?Sized,
    F: AsRef<str>,
{
    let Some(current) = current else {
        return Vec::new();
    };

    let mut diffs = Vec::with_capacity(fields.len());

    for field in fields {
        let name = field.as_ref();

        let current_value = match current.read_field(name) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(field = name, side = "current", error = %e, "Failed to read field value");
                None
            }
        };

        let old_value = match old.map(|o| o.read_field(name)) {
            Some(Ok(value)) => Ok(Some(value)),
            Some(Err(e)) => {
                warn!(field = name, side = "old", error = %e, "Failed to read field value");
                Err(())
            }
            None => Ok(None),
        };

        match (old_value, current_value) {
            (Ok(old_value), Some(current_value)) => {
                diffs.push(FieldDiff::new(name, old_value, current_value));
            }
            _ => {
                debug!(field = name, "Marking field unreadable after access failure");
                diffs.push(FieldDiff::unreadable(name));
            }
        }
    }

    diffs
}

/// One-line summary of the changed fields, `None` when nothing changed
pub fn summarize_changes(diffs: &[FieldDiff]) -> Option<String> {
    let changes: Vec<String> = diffs
        .iter()
        .filter(|d| d.changed)
        .map(|d| {
            format!(
                "{}: {} -> {}",
                d.field_name,
                d.old_value.as_deref().unwrap_or("(none)"),
                d.current_value
            )
        })
        .collect();

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::reader::FieldReadError;
    use crate::models::UNABLE_TO_READ;
    use serde_json::{json, Value};

    /// Snapshot that refuses to hand out one field
    struct Guarded {
        inner: Value,
        hidden: &'static str,
    }

    impl FieldSource for Guarded {
        fn read_field(&self, name: &str) -> Result<String, FieldReadError> {
            if name == self.hidden {
                return Err(FieldReadError::Restricted {
                    field: name.to_string(),
                });
            }
            self.inner.read_field(name)
        }
    }

    #[test]
    fn test_simple_field_change() {
        let old = json!({"name": "Alice", "age": 30});
        let current = json!({"name": "Alicia", "age": 30});

        let diffs = compute_field_diffs(&["name", "age"], Some(&old), Some(&current));
        assert_eq!(
            diffs[0],
            FieldDiff {
                field_name: "name".into(),
                old_value: Some("Alice".into()),
                current_value: "Alicia".into(),
                changed: true,
            }
        );
        assert!(!diffs[1].changed);
    }

    #[test]
    fn test_absent_current_snapshot() {
        let old = json!({"name": "Alice"});
        let diffs = compute_field_diffs(&["name", "age"], Some(&old), None::<&Value>);
        assert!(diffs.is_empty());
    }

    #[test]
    fn test_absent_old_snapshot() {
        let current = json!({"name": "Alice"});
        let diffs = compute_field_diffs(&["name"], None, Some(&current));

        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].old_value, None);
        assert_eq!(diffs[0].current_value, "Alice");
        assert!(diffs[0].changed);
    }

    #[test]
    fn test_null_renders_as_literal() {
        let old = json!({"voided_by": null});
        let current = json!({"voided_by": 3});

        let diffs = compute_field_diffs(&["voided_by"], Some(&old), Some(&current));
        assert_eq!(diffs[0].old_value.as_deref(), Some("null"));
        assert!(diffs[0].changed);
    }

    #[test]
    fn test_read_failure_on_current_side() {
        let old = Guarded {
            inner: json!({"name": "Alice", "ssn": "1"}),
            hidden: "none",
        };
        let current = Guarded {
            inner: json!({"name": "Alicia", "ssn": "2"}),
            hidden: "ssn",
        };

        let diffs = compute_field_diffs(&["name", "ssn"], Some(&old), Some(&current));
        assert!(diffs[0].changed);
        assert_eq!(diffs[1], FieldDiff::unreadable("ssn"));
        assert_eq!(diffs[1].current_value, UNABLE_TO_READ);
        assert!(!diffs[1].changed);
    }

    #[test]
    fn test_read_failure_on_old_side() {
        let old = json!("not an object");
        let current = json!({"name": "Alice"});

        let diffs = compute_field_diffs(&["name"], Some(&old), Some(&current));
        assert_eq!(diffs[0].old_value.as_deref(), Some(UNABLE_TO_READ));
        assert_eq!(diffs[0].current_value, UNABLE_TO_READ);
        assert!(!diffs[0].changed);
    }

    #[test]
    fn test_order_follows_fields() {
        let old = json!({"a": 1, "b": 2, "c": 3});
        let current = json!({"a": 10, "b": 2, "c": 30});

        let diffs = compute_field_diffs(&["c", "a", "b"], Some(&old), Some(&current));
        let names: Vec<&str> = diffs.iter().map(|d| d.field_name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_summarize_changes() {
        let old = json!({"a": 1, "b": 2, "c": 3});
        let current = json!({"a": 10, "b": 2, "c": 30});

        let diffs = compute_field_diffs(&["a", "b", "c"], Some(&old), Some(&current));
        let summary = summarize_changes(&diffs).unwrap();
        assert_eq!(summary, "a: 1 -> 10, c: 3 -> 30");
    }

    #[test]
    fn test_summarize_no_changes() {
        let snapshot = json!({"name": "Test"});
        let diffs = compute_field_diffs(&["name"], Some(&snapshot), Some(&snapshot));
        assert!(summarize_changes(&diffs).is_none());
    }

    #[test]
    fn test_summarize_first_revision() {
        let current = json!({"name": "Test"});
        let diffs = compute_field_diffs(&["name"], None, Some(&current));
        assert_eq!(summarize_changes(&diffs).unwrap(), "name: (none) -> Test");
    }
}
