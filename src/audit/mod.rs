//! Snapshot comparison for revtrail
//!
//! Turns two snapshots of the same entity into an ordered list of
//! per-field differences.
//!
//! # Architecture
//!
//! - `FieldSource`: reads one named field out of a snapshot, reporting
//!   failures as values instead of panics. Implemented for JSON snapshots.
//! - `EntitySchema`: the ordered fields of an entity type, with static and
//!   synthetic fields excluded from comparison.
//! - `compute_field_diffs`: applies the comparison policy field by field.
//!
//! # Example
//!
//! ```rust
//! use revtrail::audit::{compute_field_diffs, EntitySchema};
//! use serde_json::json;
//!
//! let old = json!({"name": "Alice"});
//! let current = json!({"name": "Alicia"});
//! let schema = EntitySchema::from_names(["name"]);
//!
//! let diffs = compute_field_diffs(&schema.comparable_fields(), Some(&old), Some(&current));
//! assert!(diffs[0].changed);
//! ```

mod diff;
mod reader;
mod schema;

pub use diff::{compute_field_diffs, summarize_changes};
pub use reader::{render_value, FieldReadError, FieldSource};
pub use schema::{EntitySchema, FieldKind, FieldSpec};
