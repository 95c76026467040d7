//! Core data models for revtrail
//!
//! This module contains the value objects exchanged with callers: revisions,
//! revision pages, field diffs and user profiles, plus typed identifiers.

pub mod diff;
pub mod ids;
pub mod revision;
pub mod user;

pub use diff::{FieldDiff, RevisionDiff, UNABLE_TO_READ};
pub use ids::{EntityId, RevisionNumber, UserId};
pub use revision::{ChangeKind, Revision, RevisionPage, RevisionRecord, UNKNOWN_AUTHOR};
pub use user::UserProfile;
