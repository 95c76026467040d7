//! Revision CLI commands
//!
//! Implements CLI commands for browsing, diffing and recording revisions.

use clap::Subcommand;
use serde_json::Value;
use tracing::warn;

use super::{page_index, type_registry};
use crate::config::Settings;
use crate::display::{
    format_revision_details, format_revision_diff, format_revision_page, format_type_list,
};
use crate::error::{AuditError, AuditResult};
use crate::models::{ChangeKind, EntityId, RevisionNumber, UserId};
use crate::services::RevisionService;
use crate::storage::{Storage, TypeRegistry};

/// Revision subcommands
#[derive(Subcommand)]
pub enum RevisionCommands {
    /// List revisions of an entity type, newest first
    List {
        /// Entity type name
        entity_type: String,
        /// Page number, starting at 1
        #[arg(short, long, default_value = "1")]
        page: usize,
        /// Revisions per page (defaults to the configured page size)
        #[arg(short = 's', long)]
        page_size: Option<usize>,
    },
    /// Count revisions of an entity type or of one entity
    Count {
        /// Entity type name
        entity_type: String,
        /// Only count revisions of this entity
        #[arg(short, long)]
        entity: Option<EntityId>,
    },
    /// List revisions of a single entity, newest first
    History {
        /// Entity type name
        entity_type: String,
        /// Entity ID
        entity_id: EntityId,
        /// Page number, starting at 1
        #[arg(short, long, default_value = "1")]
        page: usize,
        /// Revisions per page (defaults to the configured page size)
        #[arg(short = 's', long)]
        page_size: Option<usize>,
    },
    /// Show an entity as it was at a revision
    Show {
        /// Entity type name
        entity_type: String,
        /// Entity ID
        entity_id: EntityId,
        /// Revision number (e.g. "12" or "r12")
        revision: RevisionNumber,
        /// Print only the raw snapshot as JSON
        #[arg(long)]
        raw: bool,
    },
    /// Compare a revision with the previous revision of the same entity
    Diff {
        /// Entity type name
        entity_type: String,
        /// Entity ID
        entity_id: EntityId,
        /// Revision number (e.g. "12" or "r12")
        revision: RevisionNumber,
        /// Only show fields that changed
        #[arg(short, long)]
        changed: bool,
    },
    /// Record a new revision of an entity
    Record {
        /// Entity type name
        entity_type: String,
        /// Entity ID
        entity_id: EntityId,
        /// Entity state as a JSON document
        snapshot: String,
        /// Change kind (add, modify, delete)
        #[arg(short, long, default_value = "modify")]
        kind: ChangeKind,
        /// Acting user ID
        #[arg(short, long)]
        author: Option<UserId>,
    },
}

/// Handle the `types` command
///
/// Also names types that have revisions in the log but are not audited.
pub fn handle_types_command(storage: &Storage, settings: &Settings) -> AuditResult<()> {
    let registry = type_registry(settings);
    print!("{}", format_type_list(&registry.list_auditable_types()));

    let unaudited: Vec<String> = storage
        .revisions
        .entity_types()?
        .into_iter()
        .filter(|t| !registry.is_auditable(t))
        .collect();
    if !unaudited.is_empty() {
        println!();
        println!("Logged but not audited:");
        for name in &unaudited {
            println!("  {}", name);
        }
    }
    Ok(())
}

/// Handle a revision command
pub fn handle_revision_command(
    storage: &Storage,
    settings: &Settings,
    cmd: RevisionCommands,
) -> AuditResult<()> {
    let registry = type_registry(settings);
    let service = RevisionService::new(&storage.revisions, &registry, &storage.users);

    match cmd {
        RevisionCommands::List {
            entity_type,
            page,
            page_size,
        } => {
            let page_size = page_size.unwrap_or(settings.default_page_size);
            let page = service.list_revisions(&entity_type, page_index(page)?, page_size)?;
            print!("{}", format_revision_page(&page));
        }

        RevisionCommands::Count {
            entity_type,
            entity,
        } => {
            let count = match entity {
                Some(entity_id) => service.count_entity_revisions(&entity_type, entity_id)?,
                None => service.count_revisions(&entity_type)?,
            };
            println!("{}", count);
        }

        RevisionCommands::History {
            entity_type,
            entity_id,
            page,
            page_size,
        } => {
            let page_size = page_size.unwrap_or(settings.default_page_size);
            let page = service.list_entity_revisions(
                &entity_type,
                entity_id,
                page_index(page)?,
                page_size,
            )?;
            print!("{}", format_revision_page(&page));
        }

        RevisionCommands::Show {
            entity_type,
            entity_id,
            revision,
            raw,
        } => {
            if raw {
                let snapshot = service.get_entity_at_revision(&entity_type, entity_id, revision)?;
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                let found = service.get_revision(&entity_type, entity_id, revision)?;
                print!("{}", format_revision_details(&entity_type, &found));
            }
        }

        RevisionCommands::Diff {
            entity_type,
            entity_id,
            revision,
            changed,
        } => {
            let mut diff = service.diff_with_previous(&entity_type, entity_id, revision)?;
            if changed {
                diff.fields.retain(|f| f.changed);
            }
            print!("{}", format_revision_diff(&diff));
        }

        RevisionCommands::Record {
            entity_type,
            entity_id,
            snapshot,
            kind,
            author,
        } => {
            let snapshot: Value = serde_json::from_str(&snapshot).map_err(|e| {
                AuditError::Validation(format!("Snapshot is not valid JSON: {}", e))
            })?;

            if !registry.is_auditable(&entity_type) {
                warn!(entity_type = %entity_type, "Recording a revision for an unaudited type");
            }

            let record =
                storage
                    .revisions
                    .record(entity_type, entity_id, kind, author, snapshot)?;

            println!(
                "Recorded {} of {} {} as {}",
                record.change_kind, record.entity_type, record.entity_id, record.revision
            );
        }
    }

    Ok(())
}
