//! Configuration module for revtrail
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Audited type list and listing defaults

pub mod paths;
pub mod settings;

pub use paths::AuditPaths;
pub use settings::{AuditedType, Settings};
