//! JSON export functionality

use std::io::Write;

use super::RevisionExport;
use crate::error::{AuditError, AuditResult};

/// Write an export as pretty-printed JSON
pub fn export_revisions_json<W: Write>(export: &RevisionExport, writer: &mut W) -> AuditResult<()> {
    serde_json::to_writer_pretty(&mut *writer, export)
        .map_err(|e| AuditError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| AuditError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChangeKind, EntityId, Revision, RevisionNumber};
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_json_export() {
        let export = RevisionExport {
            exported_at: Utc::now(),
            app_version: "0.1.0".into(),
            entity_type: "org.example.Patient".into(),
            total_count: 1,
            revisions: vec![Revision {
                entity_id: EntityId::new(3),
                snapshot: json!({"given_name": "Ana"}),
                revision_number: RevisionNumber::new(9),
                change_kind: ChangeKind::Add,
                author_id: None,
                author_display_name: "Unknown".into(),
                timestamp: Utc::now(),
            }],
        };

        let mut output = Vec::new();
        export_revisions_json(&export, &mut output).unwrap();

        let parsed: RevisionExport = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed.entity_type, "org.example.Patient");
        assert_eq!(parsed.revisions[0].revision_number, RevisionNumber::new(9));
        assert_eq!(parsed.revisions[0].change_kind, ChangeKind::Add);
    }
}
