//! Service layer for revtrail
//!
//! The service layer turns raw store rows into caller-facing revision
//! values: pagination, ordering, author resolution and revision diffs.

pub mod revision;
pub mod username;

pub use revision::RevisionService;
pub use username::UsernameResolver;
