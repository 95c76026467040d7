//! Revision store backed by a JSON-lines file
//!
//! Each line of `revisions.jsonl` is one complete `RevisionRecord`. Records
//! are appended in revision order and flushed immediately; the whole log is
//! held in memory once loaded.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use crate::error::{AuditError, AuditResult};
use crate::models::{ChangeKind, EntityId, RevisionNumber, RevisionRecord, UserId};

use super::file_io::{append_json_lines, read_json_lines};
use super::traits::RevisionStore;

/// One entity change inside a batch sharing a revision number
#[derive(Debug, Clone)]
pub struct EntityChange {
    pub entity_type: String,
    pub entity_id: EntityId,
    pub change_kind: ChangeKind,
    pub snapshot: Value,
}

/// Append-only revision log
pub struct JsonlRevisionStore {
    path: PathBuf,
    /// Records in non-decreasing revision order
    data: RwLock<Vec<RevisionRecord>>,
}

impl JsonlRevisionStore {
    /// Create a store for the log at `path`; call `load` to read it
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Load every record from disk, replacing what is in memory
    pub fn load(&self) -> AuditResult<()> {
        let records: Vec<RevisionRecord> = read_json_lines(&self.path)?;

        check_sequence(&[], &records).map_err(|(index, reason)| {
            AuditError::Storage(format!(
                "Corrupt revision log {} at record {}: {}",
                self.path.display(),
                index + 1,
                reason
            ))
        })?;

        let mut data = self.write()?;

        debug!(path = %self.path.display(), records = records.len(), "Loaded revision log");
        *data = records;
        Ok(())
    }

    /// Append a record, enforcing revision order
    ///
    /// The record must not go back in time, and no entity may have two
    /// records with the same revision number.
    pub fn append(&self, record: RevisionRecord) -> AuditResult<()> {
        let mut data = self.write()?;
        self.commit(&mut data, std::slice::from_ref(&record))
    }

    /// Record one change under the next revision number
    pub fn record(
        &self,
        entity_type: impl Into<String>,
        entity_id: EntityId,
        change_kind: ChangeKind,
        author_id: Option<UserId>,
        snapshot: Value,
    ) -> AuditResult<RevisionRecord> {
        let change = EntityChange {
            entity_type: entity_type.into(),
            entity_id,
            change_kind,
            snapshot,
        };
        let mut records = self.record_batch(author_id, vec![change])?;
        records
            .pop()
            .ok_or_else(|| AuditError::Storage("Recorded batch came back empty".into()))
    }

    /// Record several changes that share one revision number
    ///
    /// The batch is written whole or not at all. An entity may appear in a
    /// batch only once.
    pub fn record_batch(
        &self,
        author_id: Option<UserId>,
        changes: Vec<EntityChange>,
    ) -> AuditResult<Vec<RevisionRecord>> {
        if changes.is_empty() {
            return Ok(Vec::new());
        }

        let mut data = self.write()?;
        let revision = data
            .last()
            .map_or(RevisionNumber::new(1), |r| r.revision.next());
        let timestamp = Utc::now();

        let records: Vec<RevisionRecord> = changes
            .into_iter()
            .map(|change| RevisionRecord {
                entity_type: change.entity_type,
                entity_id: change.entity_id,
                revision,
                change_kind: change.change_kind,
                author_id,
                timestamp,
                snapshot: change.snapshot,
            })
            .collect();

        self.commit(&mut data, &records)?;

        debug!(%revision, changes = records.len(), "Recorded revision");
        Ok(records)
    }

    /// Highest revision number in the log
    pub fn latest_revision(&self) -> AuditResult<Option<RevisionNumber>> {
        Ok(self.read()?.last().map(|r| r.revision))
    }

    /// Number of records in the log
    pub fn len(&self) -> AuditResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> AuditResult<bool> {
        Ok(self.read()?.is_empty())
    }

    /// Distinct entity types that have at least one record, sorted
    pub fn entity_types(&self) -> AuditResult<Vec<String>> {
        let data = self.read()?;
        let mut types: Vec<String> = data.iter().map(|r| r.entity_type.clone()).collect();
        types.sort();
        types.dedup();
        Ok(types)
    }

    /// Get the path to the log file
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn write(&self) -> AuditResult<RwLockWriteGuard<'_, Vec<RevisionRecord>>> {
        self.data
            .write()
            .map_err(|e| AuditError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Validate `records` against the log, then write and keep them
    fn commit(
        &self,
        data: &mut Vec<RevisionRecord>,
        records: &[RevisionRecord],
    ) -> AuditResult<()> {
        check_sequence(data, records).map_err(|(_, reason)| AuditError::Validation(reason))?;
        append_json_lines(&self.path, records)?;
        data.extend_from_slice(records);
        Ok(())
    }

    fn read(&self) -> AuditResult<RwLockReadGuard<'_, Vec<RevisionRecord>>> {
        self.data
            .read()
            .map_err(|e| AuditError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    /// Matching records, newest first; ties on revision go by entity id
    fn newest_first<F>(
        &self,
        matches: F,
        offset: usize,
        limit: usize,
    ) -> AuditResult<Vec<RevisionRecord>>
    where
        F: Fn(&RevisionRecord) -> bool,
    {
        let data = self.read()?;
        let mut found: Vec<&RevisionRecord> = data.iter().filter(|r| matches(r)).collect();
        found.sort_by(|a, b| {
            b.revision
                .cmp(&a.revision)
                .then(a.entity_id.cmp(&b.entity_id))
        });

        Ok(found
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    fn find(
        &self,
        entity_type: &str,
        entity_id: EntityId,
        revision: RevisionNumber,
    ) -> AuditResult<Option<RevisionRecord>> {
        let data = self.read()?;
        Ok(data
            .iter()
            .find(|r| {
                r.revision == revision && r.entity_id == entity_id && r.entity_type == entity_type
            })
            .cloned())
    }
}

/// Check that `incoming` may follow `existing` in the log
///
/// Revisions never decrease, and within one revision number each entity
/// appears at most once. On failure returns the index into `incoming` of the
/// offending record.
fn check_sequence<'a>(
    existing: &'a [RevisionRecord],
    incoming: &'a [RevisionRecord],
) -> Result<(), (usize, String)> {
    let mut current = existing.last().map(|r| r.revision);
    let mut group: HashSet<(&str, EntityId)> = existing
        .iter()
        .rev()
        .take_while(|r| Some(r.revision) == current)
        .map(|r| (r.entity_type.as_str(), r.entity_id))
        .collect();

    for (index, record) in incoming.iter().enumerate() {
        match current {
            Some(previous) if record.revision < previous => {
                return Err((
                    index,
                    format!("revision {} recorded after {}", record.revision, previous),
                ));
            }
            Some(previous) if record.revision == previous => {}
            _ => {
                group.clear();
                current = Some(record.revision);
            }
        }

        if !group.insert((record.entity_type.as_str(), record.entity_id)) {
            return Err((
                index,
                format!(
                    "{} {} has revision {} twice",
                    record.entity_type, record.entity_id, record.revision
                ),
            ));
        }
    }

    Ok(())
}

impl RevisionStore for JsonlRevisionStore {
    fn list_revisions(
        &self,
        entity_type: &str,
        offset: usize,
        limit: usize,
    ) -> AuditResult<Vec<RevisionRecord>> {
        self.newest_first(|r| r.entity_type == entity_type, offset, limit)
    }

    fn count_revisions(&self, entity_type: &str) -> AuditResult<u64> {
        let data = self.read()?;
        Ok(data.iter().filter(|r| r.entity_type == entity_type).count() as u64)
    }

    fn list_entity_revisions(
        &self,
        entity_type: &str,
        entity_id: EntityId,
        offset: usize,
        limit: usize,
    ) -> AuditResult<Vec<RevisionRecord>> {
        self.newest_first(
            |r| r.entity_type == entity_type && r.entity_id == entity_id,
            offset,
            limit,
        )
    }

    fn count_entity_revisions(&self, entity_type: &str, entity_id: EntityId) -> AuditResult<u64> {
        let data = self.read()?;
        Ok(data
            .iter()
            .filter(|r| r.entity_type == entity_type && r.entity_id == entity_id)
            .count() as u64)
    }

    fn get_snapshot(
        &self,
        entity_type: &str,
        entity_id: EntityId,
        revision: RevisionNumber,
    ) -> AuditResult<Option<Value>> {
        Ok(self
            .find(entity_type, entity_id, revision)?
            .map(|r| r.snapshot))
    }

    fn get_snapshot_with_meta(
        &self,
        entity_type: &str,
        entity_id: EntityId,
        revision: RevisionNumber,
    ) -> AuditResult<Option<RevisionRecord>> {
        self.find(entity_type, entity_id, revision)
    }

    fn previous_revision(
        &self,
        entity_type: &str,
        entity_id: EntityId,
        revision: RevisionNumber,
    ) -> AuditResult<Option<RevisionNumber>> {
        let data = self.read()?;
        Ok(data
            .iter()
            .filter(|r| {
                r.revision < revision && r.entity_id == entity_id && r.entity_type == entity_type
            })
            .map(|r| r.revision)
            .max())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    const PATIENT: &str = "org.example.Patient";

    fn create_test_store() -> (JsonlRevisionStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonlRevisionStore::new(temp_dir.path().join("revisions.jsonl"));
        store.load().unwrap();
        (store, temp_dir)
    }

    fn record_name(
        store: &JsonlRevisionStore,
        id: u64,
        kind: ChangeKind,
        name: &str,
    ) -> RevisionRecord {
        store
            .record(PATIENT, EntityId::new(id), kind, Some(UserId::new(1)), json!({"name": name}))
            .unwrap()
    }

    #[test]
    fn test_record_assigns_increasing_revisions() {
        let (store, _temp) = create_test_store();

        let first = record_name(&store, 1, ChangeKind::Add, "Alice");
        let second = record_name(&store, 1, ChangeKind::Modify, "Alicia");

        assert_eq!(first.revision, RevisionNumber::new(1));
        assert_eq!(second.revision, RevisionNumber::new(2));
        assert_eq!(store.latest_revision().unwrap(), Some(RevisionNumber::new(2)));
    }

    #[test]
    fn test_list_is_newest_first_and_paginated() {
        let (store, _temp) = create_test_store();
        for i in 0..7 {
            record_name(&store, i % 2, ChangeKind::Modify, &format!("v{}", i));
        }

        let page = store.list_revisions(PATIENT, 0, 5).unwrap();
        assert_eq!(page.len(), 5);
        assert_eq!(page[0].revision, RevisionNumber::new(7));
        assert!(page.windows(2).all(|w| w[0].revision > w[1].revision));

        assert_eq!(store.list_revisions(PATIENT, 5, 5).unwrap().len(), 2);
        assert!(store.list_revisions(PATIENT, 10, 5).unwrap().is_empty());
        assert_eq!(store.count_revisions(PATIENT).unwrap(), 7);
    }

    #[test]
    fn test_entity_history() {
        let (store, _temp) = create_test_store();
        record_name(&store, 1, ChangeKind::Add, "Alice");
        record_name(&store, 2, ChangeKind::Add, "Bob");
        record_name(&store, 1, ChangeKind::Modify, "Alicia");

        let history = store
            .list_entity_revisions(PATIENT, EntityId::new(1), 0, 10)
            .unwrap();
        let revisions: Vec<u64> = history.iter().map(|r| r.revision.value()).collect();
        assert_eq!(revisions, vec![3, 1]);
        assert_eq!(store.count_entity_revisions(PATIENT, EntityId::new(2)).unwrap(), 1);
    }

    #[test]
    fn test_snapshot_lookup() {
        let (store, _temp) = create_test_store();
        record_name(&store, 1, ChangeKind::Add, "Alice");

        let snapshot = store
            .get_snapshot(PATIENT, EntityId::new(1), RevisionNumber::new(1))
            .unwrap()
            .unwrap();
        assert_eq!(snapshot["name"], "Alice");

        assert!(store
            .get_snapshot(PATIENT, EntityId::new(1), RevisionNumber::new(2))
            .unwrap()
            .is_none());
        assert!(store
            .get_snapshot("org.example.Visit", EntityId::new(1), RevisionNumber::new(1))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_previous_revision() {
        let (store, _temp) = create_test_store();
        record_name(&store, 1, ChangeKind::Add, "Alice");
        record_name(&store, 2, ChangeKind::Add, "Bob");
        record_name(&store, 1, ChangeKind::Modify, "Alicia");

        let id = EntityId::new(1);
        assert_eq!(
            store.previous_revision(PATIENT, id, RevisionNumber::new(3)).unwrap(),
            Some(RevisionNumber::new(1))
        );
        assert_eq!(
            store.previous_revision(PATIENT, id, RevisionNumber::new(1)).unwrap(),
            None
        );
    }

    #[test]
    fn test_batch_shares_revision_number() {
        let (store, _temp) = create_test_store();
        let changes = vec![
            EntityChange {
                entity_type: PATIENT.into(),
                entity_id: EntityId::new(1),
                change_kind: ChangeKind::Add,
                snapshot: json!({"name": "Alice"}),
            },
            EntityChange {
                entity_type: "org.example.Visit".into(),
                entity_id: EntityId::new(9),
                change_kind: ChangeKind::Add,
                snapshot: json!({"patient": 1}),
            },
        ];

        let records = store.record_batch(None, changes).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.revision == RevisionNumber::new(1)));
        assert_eq!(
            store.entity_types().unwrap(),
            vec!["org.example.Patient".to_string(), "org.example.Visit".to_string()]
        );
    }

    #[test]
    fn test_append_rejects_going_backwards() {
        let (store, _temp) = create_test_store();
        let record = record_name(&store, 1, ChangeKind::Add, "Alice");
        record_name(&store, 1, ChangeKind::Modify, "Alicia");

        let err = store.append(record).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_append_rejects_duplicate_entity_revision() {
        let (store, _temp) = create_test_store();
        let record = record_name(&store, 1, ChangeKind::Add, "Alice");

        assert!(store.append(record).unwrap_err().is_validation());
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_survives_reload() {
        let (store, temp) = create_test_store();
        record_name(&store, 1, ChangeKind::Add, "Alice");
        record_name(&store, 1, ChangeKind::Delete, "Alice");

        let reopened = JsonlRevisionStore::new(temp.path().join("revisions.jsonl"));
        reopened.load().unwrap();

        assert_eq!(reopened.len().unwrap(), 2);
        let last = reopened
            .get_snapshot_with_meta(PATIENT, EntityId::new(1), RevisionNumber::new(2))
            .unwrap()
            .unwrap();
        assert_eq!(last.change_kind, ChangeKind::Delete);
        assert_eq!(last.author_id, Some(UserId::new(1)));
    }

    #[test]
    fn test_load_rejects_out_of_order_log() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("revisions.jsonl");
        let late = RevisionRecord {
            entity_type: PATIENT.into(),
            entity_id: EntityId::new(1),
            revision: RevisionNumber::new(5),
            change_kind: ChangeKind::Add,
            author_id: None,
            timestamp: Utc::now(),
            snapshot: json!({}),
        };
        let early = RevisionRecord {
            revision: RevisionNumber::new(2),
            ..late.clone()
        };
        append_json_lines(&path, &[late, early]).unwrap();

        let store = JsonlRevisionStore::new(path);
        let err = store.load().unwrap_err();
        assert!(matches!(err, AuditError::Storage(_)));
    }

    #[test]
    fn test_batch_with_repeated_entity_writes_nothing() {
        let (store, temp) = create_test_store();
        record_name(&store, 2, ChangeKind::Add, "Bob");

        let change = EntityChange {
            entity_type: PATIENT.into(),
            entity_id: EntityId::new(1),
            change_kind: ChangeKind::Add,
            snapshot: json!({"name": "Alice"}),
        };
        let err = store
            .record_batch(None, vec![change.clone(), change])
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.latest_revision().unwrap(), Some(RevisionNumber::new(1)));

        let reopened = JsonlRevisionStore::new(temp.path().join("revisions.jsonl"));
        reopened.load().unwrap();
        assert_eq!(reopened.len().unwrap(), 1);
        assert_eq!(reopened.count_entity_revisions(PATIENT, EntityId::new(1)).unwrap(), 0);
    }

    #[test]
    fn test_concurrent_records_get_distinct_revisions() {
        let (store, _temp) = create_test_store();
        let store = std::sync::Arc::new(store);

        let handles: Vec<_> = (0..4)
            .map(|id| {
                let store = std::sync::Arc::clone(&store);
                std::thread::spawn(move || {
                    (0..10)
                        .map(|_| {
                            let id = EntityId::new(id);
                            let record = store
                                .record(PATIENT, id, ChangeKind::Modify, None, json!({}))
                                .unwrap();
                            record.revision
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut revisions: Vec<RevisionNumber> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        revisions.sort();
        revisions.dedup();
        assert_eq!(revisions.len(), 40);
    }

    #[test]
    fn test_load_rejects_repeated_entity_within_revision() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("revisions.jsonl");
        let first = RevisionRecord {
            entity_type: PATIENT.into(),
            entity_id: EntityId::new(1),
            revision: RevisionNumber::new(5),
            change_kind: ChangeKind::Add,
            author_id: None,
            timestamp: Utc::now(),
            snapshot: json!({}),
        };
        let other = RevisionRecord {
            entity_id: EntityId::new(2),
            ..first.clone()
        };
        append_json_lines(&path, &[first.clone(), other, first]).unwrap();

        let store = JsonlRevisionStore::new(path);
        let err = store.load().unwrap_err();
        assert!(matches!(&err, AuditError::Storage(msg) if msg.contains("at record 3")));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_empty_log() {
        let (store, _temp) = create_test_store();
        assert!(store.is_empty().unwrap());
        assert_eq!(store.latest_revision().unwrap(), None);
        assert_eq!(store.count_revisions(PATIENT).unwrap(), 0);
    }
}
