//! Revision query service
//!
//! Provides paginated revision listings, single-revision lookups and
//! revision-to-revision diffs on top of a revision store, a type registry
//! and a user directory.
//!
//! Listings and counts for types the registry does not know come back empty
//! instead of failing, so stale type names never break a history view.
//! Single lookups for such types report not found.

use serde_json::Value;
use tracing::debug;

use super::username::UsernameResolver;
use crate::audit::{compute_field_diffs, EntitySchema};
use crate::error::{AuditError, AuditResult};
use crate::models::{
    EntityId, Revision, RevisionDiff, RevisionNumber, RevisionPage, RevisionRecord,
};
use crate::storage::{RevisionStore, TypeRegistry, UserDirectory};

/// Service for revision history queries
pub struct RevisionService<'a> {
    store: &'a dyn RevisionStore,
    registry: &'a dyn TypeRegistry,
    users: UsernameResolver<'a>,
}

impl<'a> RevisionService<'a> {
    /// Create a new revision service
    pub fn new(
        store: &'a dyn RevisionStore,
        registry: &'a dyn TypeRegistry,
        directory: &'a dyn UserDirectory,
    ) -> Self {
        Self {
            store,
            registry,
            users: UsernameResolver::new(directory),
        }
    }

    /// Audited entity types, sorted
    pub fn auditable_types(&self) -> Vec<String> {
        let mut types = self.registry.list_auditable_types();
        types.sort();
        types
    }

    /// Get one page of revisions for an entity type, newest first
    ///
    /// # Errors
    ///
    /// Returns a validation error when `page_size` is zero, or the store's
    /// error when a query against an audited type fails.
    pub fn list_revisions(
        &self,
        entity_type: &str,
        page_index: usize,
        page_size: usize,
    ) -> AuditResult<RevisionPage> {
        validate_page_size(page_size)?;

        if !self.registry.is_auditable(entity_type) {
            debug!(entity_type, "Listing revisions of unaudited type");
            return Ok(RevisionPage::empty(entity_type, page_index, page_size));
        }

        let total_count = self.store.count_revisions(entity_type)?;
        self.build_page(entity_type, page_index, page_size, total_count, |offset| {
            self.store.list_revisions(entity_type, offset, page_size)
        })
    }

    /// Total revisions for an entity type; zero for unaudited types
    pub fn count_revisions(&self, entity_type: &str) -> AuditResult<u64> {
        if !self.registry.is_auditable(entity_type) {
            debug!(entity_type, "Counting revisions of unaudited type");
            return Ok(0);
        }
        self.store.count_revisions(entity_type)
    }

    /// Get one page of revisions for a single entity instance, newest first
    pub fn list_entity_revisions(
        &self,
        entity_type: &str,
        entity_id: EntityId,
        page_index: usize,
        page_size: usize,
    ) -> AuditResult<RevisionPage> {
        validate_page_size(page_size)?;

        if !self.registry.is_auditable(entity_type) {
            debug!(entity_type, %entity_id, "Listing history of unaudited type");
            return Ok(RevisionPage::empty(entity_type, page_index, page_size));
        }

        let total_count = self.store.count_entity_revisions(entity_type, entity_id)?;
        self.build_page(entity_type, page_index, page_size, total_count, |offset| {
            self.store
                .list_entity_revisions(entity_type, entity_id, offset, page_size)
        })
    }

    /// Total revisions for a single entity instance; zero for unaudited types
    pub fn count_entity_revisions(
        &self,
        entity_type: &str,
        entity_id: EntityId,
    ) -> AuditResult<u64> {
        if !self.registry.is_auditable(entity_type) {
            debug!(entity_type, %entity_id, "Counting history of unaudited type");
            return Ok(0);
        }
        self.store.count_entity_revisions(entity_type, entity_id)
    }

    /// The entity's state at an exact revision
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the type is not audited or the store has no
    /// such entity at that revision.
    pub fn get_entity_at_revision(
        &self,
        entity_type: &str,
        entity_id: EntityId,
        revision: RevisionNumber,
    ) -> AuditResult<Value> {
        self.ensure_auditable(entity_type, entity_id, revision)?;

        self.store
            .get_snapshot(entity_type, entity_id, revision)?
            .ok_or_else(|| AuditError::revision_not_found(entity_type, entity_id, revision))
    }

    /// A single revision with its metadata and resolved author
    ///
    /// # Errors
    ///
    /// Returns `NotFound` under the same conditions as `get_entity_at_revision`.
    pub fn get_revision(
        &self,
        entity_type: &str,
        entity_id: EntityId,
        revision: RevisionNumber,
    ) -> AuditResult<Revision> {
        self.ensure_auditable(entity_type, entity_id, revision)?;

        let record = self
            .store
            .get_snapshot_with_meta(entity_type, entity_id, revision)?
            .ok_or_else(|| AuditError::revision_not_found(entity_type, entity_id, revision))?;

        Ok(self.resolve(record))
    }

    /// Compare a revision against the previous revision of the same entity
    ///
    /// The first revision of an entity is compared against nothing, so every
    /// field shows up as changed with no old value.
    pub fn diff_with_previous(
        &self,
        entity_type: &str,
        entity_id: EntityId,
        revision: RevisionNumber,
    ) -> AuditResult<RevisionDiff> {
        let current = self.get_revision(entity_type, entity_id, revision)?;

        let previous_revision = self
            .store
            .previous_revision(entity_type, entity_id, revision)?;
        let old = match previous_revision {
            Some(previous) => self.store.get_snapshot(entity_type, entity_id, previous)?,
            None => None,
        };

        let schema = self
            .registry
            .schema_for(entity_type)
            .unwrap_or_else(|| EntitySchema::infer(&current.snapshot, old.as_ref()));

        let fields = compute_field_diffs(
            &schema.comparable_fields(),
            old.as_ref(),
            Some(&current.snapshot),
        );

        debug!(
            entity_type,
            %entity_id,
            %revision,
            previous = ?previous_revision,
            changed = fields.iter().filter(|f| f.changed).count(),
            "Computed revision diff"
        );

        Ok(RevisionDiff {
            entity_type: entity_type.to_string(),
            revision: current,
            previous_revision,
            fields,
        })
    }

    fn ensure_auditable(
        &self,
        entity_type: &str,
        entity_id: EntityId,
        revision: RevisionNumber,
    ) -> AuditResult<()> {
        if self.registry.is_auditable(entity_type) {
            Ok(())
        } else {
            debug!(entity_type, "Lookup against unaudited type");
            Err(AuditError::revision_not_found(entity_type, entity_id, revision))
        }
    }

    fn resolve(&self, record: RevisionRecord) -> Revision {
        let author = self.users.resolve_display_name(record.author_id);
        Revision::from_record(record, author)
    }

    fn build_page<F>(
        &self,
        entity_type: &str,
        page_index: usize,
        page_size: usize,
        total_count: u64,
        fetch: F,
    ) -> AuditResult<RevisionPage>
    where
        F: FnOnce(usize) -> AuditResult<Vec<RevisionRecord>>,
    {
        let mut page = RevisionPage::empty(entity_type, page_index, page_size);
        page.total_count = total_count;

        let offset = match page_index.checked_mul(page_size) {
            Some(offset) if (offset as u64) < total_count => offset,
            _ => {
                debug!(entity_type, page_index, page_size, total_count, "Page past the end");
                return Ok(page);
            }
        };

        let mut records = fetch(offset)?;
        records.sort_by(|a, b| b.revision.cmp(&a.revision));
        records.truncate(page_size);

        page.items = records.into_iter().map(|r| self.resolve(r)).collect();

        debug!(
            entity_type,
            page_index,
            items = page.items.len(),
            total_count,
            "Listed revisions"
        );
        Ok(page)
    }
}

fn validate_page_size(page_size: usize) -> AuditResult<()> {
    if page_size == 0 {
        return Err(AuditError::Validation(
            "Page size must be greater than zero".into(),
        ));
    }
    Ok(())
}
