//! YAML export functionality
//!
//! Same content as the JSON export, preceded by a comment header.

use std::io::Write;

use super::RevisionExport;
use crate::error::{AuditError, AuditResult};

/// Write an export as YAML with a header comment
pub fn export_revisions_yaml<W: Write>(export: &RevisionExport, writer: &mut W) -> AuditResult<()> {
    write_header(export, writer).map_err(|e| AuditError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, export).map_err(|e| AuditError::Export(e.to_string()))?;

    Ok(())
}

fn write_header<W: Write>(export: &RevisionExport, writer: &mut W) -> std::io::Result<()> {
    writeln!(writer, "# revtrail revision history export")?;
    writeln!(writer, "# Entity type: {}", export.entity_type)?;
    writeln!(writer, "# Generated: {}", export.exported_at)?;
    writeln!(writer, "# App Version: {}", export.app_version)?;
    writeln!(writer, "# Revisions: {}", export.total_count)?;
    writeln!(writer)
}
