//! revtrail - revision history for audited entities
//!
//! This library answers history questions over a versioned entity store:
//! paginated revision listings per entity type or per entity, the state of
//! an entity at an exact revision, the display name of whoever made each
//! change, and field-by-field comparisons between consecutive revisions.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `audit`: Field reading, entity schemas and the field differ
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Revisions, pages, field diffs and user profiles
//! - `storage`: Collaborator traits and JSON file-backed implementations
//! - `services`: Revision queries and author resolution
//! - `display`: Plain-text formatting for the command line
//! - `export`: JSON and YAML history exports
//! - `cli`: Command handlers for the `revtrail` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use revtrail::config::{AuditPaths, Settings};
//! use revtrail::services::RevisionService;
//! use revtrail::storage::{StaticTypeRegistry, Storage};
//!
//! let paths = AuditPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut storage = Storage::new(paths)?;
//! storage.load_all()?;
//!
//! let registry = StaticTypeRegistry::from_settings(&settings);
//! let service = RevisionService::new(&storage.revisions, &registry, &storage.users);
//! let page = service.list_revisions("org.example.Patient", 0, 20)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{AuditError, AuditResult};
