//! Field-level comparison results

use serde::{Deserialize, Serialize};

use super::ids::RevisionNumber;
use super::revision::Revision;

/// Placeholder shown for both sides of a field that could not be read
pub const UNABLE_TO_READ: &str = "Unable to read";

/// Comparison result for one field between two snapshots of the same entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDiff {
    pub field_name: String,

    /// Rendered old value, `None` when there was no old snapshot
    pub old_value: Option<String>,

    pub current_value: String,

    pub changed: bool,
}

impl FieldDiff {
    pub fn new(
        field_name: impl Into<String>,
        old_value: Option<String>,
        current_value: impl Into<String>,
    ) -> Self {
        let current_value = current_value.into();
        let changed = old_value.as_deref() != Some(current_value.as_str());
        Self {
            field_name: field_name.into(),
            old_value,
            current_value,
            changed,
        }
    }

    /// A field that failed to read on at least one side
    pub fn unreadable(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            old_value: Some(UNABLE_TO_READ.to_string()),
            current_value: UNABLE_TO_READ.to_string(),
            changed: false,
        }
    }
}

/// A revision compared against the previous revision of the same entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionDiff {
    pub entity_type: String,
    pub revision: Revision,
    /// Revision the old side was read from, `None` for the first revision
    pub previous_revision: Option<RevisionNumber>,
    pub fields: Vec<FieldDiff>,
}

impl RevisionDiff {
    /// Only the fields whose value changed
    pub fn changed_fields(&self) -> impl Iterator<Item = &FieldDiff> {
        self.fields.iter().filter(|f| f.changed)
    }
}
