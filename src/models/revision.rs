//! Revision data structures
//!
//! Defines the change classification, the raw rows a revision store hands
//! back, and the resolved `Revision` / `RevisionPage` values returned to
//! callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ids::{EntityId, RevisionNumber, UserId};
use crate::error::AuditError;

/// Author display name used when no better name can be resolved
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// What kind of operation produced a revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    /// Entity was created
    Add,
    /// Entity was updated
    Modify,
    /// Entity was deleted
    Delete,
}

impl ChangeKind {
    /// Numeric code used by versioned stores (0 = add, 1 = modify, 2 = delete)
    pub fn code(&self) -> u8 {
        match self {
            ChangeKind::Add => 0,
            ChangeKind::Modify => 1,
            ChangeKind::Delete => 2,
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeKind::Add => write!(f, "ADD"),
            ChangeKind::Modify => write!(f, "MODIFY"),
            ChangeKind::Delete => write!(f, "DELETE"),
        }
    }
}

impl TryFrom<u8> for ChangeKind {
    type Error = AuditError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ChangeKind::Add),
            1 => Ok(ChangeKind::Modify),
            2 => Ok(ChangeKind::Delete),
            other => Err(AuditError::Validation(format!(
                "Unknown change kind code: {}",
                other
            ))),
        }
    }
}

impl std::str::FromStr for ChangeKind {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" | "create" => Ok(ChangeKind::Add),
            "modify" | "mod" | "update" => Ok(ChangeKind::Modify),
            "delete" | "del" => Ok(ChangeKind::Delete),
            other => Err(AuditError::Validation(format!(
                "Unknown change kind: {}",
                other
            ))),
        }
    }
}

/// A raw revision row as stored by a versioned-entity store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionRecord {
    /// Identifier of the audited entity type
    pub entity_type: String,

    /// ID of the entity instance
    pub entity_id: EntityId,

    /// Store-assigned, strictly increasing revision number
    pub revision: RevisionNumber,

    /// Operation that produced this revision
    pub change_kind: ChangeKind,

    /// Acting user, absent for system-generated changes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<UserId>,

    /// When the revision was recorded (UTC)
    pub timestamp: DateTime<Utc>,

    /// Full state of the entity at this revision
    pub snapshot: Value,
}

/// One historical version of one entity instance, with its author resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revision {
    pub entity_id: EntityId,
    pub snapshot: Value,
    pub revision_number: RevisionNumber,
    pub change_kind: ChangeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<UserId>,
    pub author_display_name: String,
    pub timestamp: DateTime<Utc>,
}

impl Revision {
    /// Build a revision from a raw store row and an already resolved author name
    pub fn from_record(record: RevisionRecord, author_display_name: String) -> Self {
        Self {
            entity_id: record.entity_id,
            snapshot: record.snapshot,
            revision_number: record.revision,
            change_kind: record.change_kind,
            author_id: record.author_id,
            author_display_name,
            timestamp: record.timestamp,
        }
    }
}

/// A single page of revisions for one entity type, newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionPage {
    pub entity_type: String,
    pub items: Vec<Revision>,
    pub page_index: usize,
    pub page_size: usize,
    /// Total revisions available, independent of pagination
    pub total_count: u64,
}

impl RevisionPage {
    /// An empty page with a zero total
    pub fn empty(entity_type: impl Into<String>, page_index: usize, page_size: usize) -> Self {
        Self {
            entity_type: entity_type.into(),
            items: Vec::new(),
            page_index,
            page_size,
            total_count: 0,
        }
    }

    /// Number of pages needed to show every revision
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(self.page_size as u64)
    }

    /// Whether a page after this one has items
    pub fn has_next(&self) -> bool {
        (self.page_index as u64 + 1) < self.total_pages()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
