//! CLI command for revision history export

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Args;

use super::type_registry;
use crate::config::Settings;
use crate::error::{AuditError, AuditResult};
use crate::export::{export_revisions_json, export_revisions_yaml, ExportFormat, RevisionExport};
use crate::services::RevisionService;
use crate::storage::Storage;

/// Arguments for the `export` command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Entity type to export
    pub entity_type: String,

    /// Output file path (defaults to the exports directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ExportFormat,
}

/// Handle the export command
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    args: ExportArgs,
) -> AuditResult<()> {
    let registry = type_registry(settings);
    let service = RevisionService::new(&storage.revisions, &registry, &storage.users);
    let export = RevisionExport::collect(&service, &args.entity_type)?;

    let output = match args.output {
        Some(path) => path,
        None => {
            let dir = storage.paths().export_dir();
            std::fs::create_dir_all(&dir).map_err(|e| {
                AuditError::Export(format!("Failed to create {}: {}", dir.display(), e))
            })?;
            dir.join(format!(
                "{}-{}.{}",
                args.entity_type,
                export.exported_at.format("%Y%m%d%H%M%S"),
                args.format.extension()
            ))
        }
    };

    let file = File::create(&output).map_err(|e| {
        AuditError::Export(format!("Failed to create file {}: {}", output.display(), e))
    })?;
    let mut writer = BufWriter::new(file);

    match args.format {
        ExportFormat::Json => export_revisions_json(&export, &mut writer)?,
        ExportFormat::Yaml => export_revisions_yaml(&export, &mut writer)?,
    }
    writer.flush().map_err(|e| AuditError::Export(e.to_string()))?;

    println!(
        "Exported {} revisions of {} to: {}",
        export.revisions.len(),
        export.entity_type,
        output.display()
    );

    Ok(())
}
