//! Collaborator interfaces the query services are written against
//!
//! The services never touch storage directly. A versioned-entity store, a
//! registry of audited types, and a user directory are handed in as trait
//! objects so any backend can sit behind them.

use serde_json::Value;

use crate::audit::EntitySchema;
use crate::error::AuditResult;
use crate::models::{EntityId, RevisionNumber, RevisionRecord, UserId, UserProfile};

/// A store of historical entity versions
pub trait RevisionStore: Send + Sync {
    /// Revisions of one type, newest first, skipping `offset` and returning at most `limit`
    fn list_revisions(
        &self,
        entity_type: &str,
        offset: usize,
        limit: usize,
    ) -> AuditResult<Vec<RevisionRecord>>;

    /// Total revisions recorded for one type
    fn count_revisions(&self, entity_type: &str) -> AuditResult<u64>;

    /// Revisions of one entity instance, newest first
    fn list_entity_revisions(
        &self,
        entity_type: &str,
        entity_id: EntityId,
        offset: usize,
        limit: usize,
    ) -> AuditResult<Vec<RevisionRecord>>;

    /// Total revisions recorded for one entity instance
    fn count_entity_revisions(&self, entity_type: &str, entity_id: EntityId) -> AuditResult<u64>;

    /// The entity's state at exactly `revision`
    fn get_snapshot(
        &self,
        entity_type: &str,
        entity_id: EntityId,
        revision: RevisionNumber,
    ) -> AuditResult<Option<Value>>;

    /// The entity's state at exactly `revision`, with author, time and change kind
    fn get_snapshot_with_meta(
        &self,
        entity_type: &str,
        entity_id: EntityId,
        revision: RevisionNumber,
    ) -> AuditResult<Option<RevisionRecord>>;

    /// The latest revision of the same entity strictly before `revision`
    fn previous_revision(
        &self,
        entity_type: &str,
        entity_id: EntityId,
        revision: RevisionNumber,
    ) -> AuditResult<Option<RevisionNumber>>;
}

/// Decides which entity types are audited
pub trait TypeRegistry: Send + Sync {
    fn is_auditable(&self, entity_type: &str) -> bool;

    /// Every audited type identifier, sorted
    fn list_auditable_types(&self) -> Vec<String>;

    /// Declared fields of a type, when the registry knows them
    fn schema_for(&self, _entity_type: &str) -> Option<EntitySchema> {
        None
    }
}

/// Looks up the users who authored revisions
pub trait UserDirectory: Send + Sync {
    fn get_user(&self, id: UserId) -> AuditResult<Option<UserProfile>>;
}
