//! Audited type registries
//!
//! `StaticTypeRegistry` answers from configuration. `CachedTypeRegistry`
//! wraps any registry and computes the set of audited types once.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use tracing::debug;

use crate::audit::EntitySchema;
use crate::config::{AuditedType, Settings};

use super::traits::TypeRegistry;

/// Registry backed by a fixed list of audited types
#[derive(Debug, Clone, Default)]
pub struct StaticTypeRegistry {
    types: BTreeMap<String, Option<EntitySchema>>,
}

impl StaticTypeRegistry {
    pub fn new<I>(types: I) -> Self
    where
        I: IntoIterator<Item = AuditedType>,
    {
        Self {
            types: types
                .into_iter()
                .map(|t| {
                    let schema = t.schema();
                    (t.name.trim().to_string(), schema)
                })
                .collect(),
        }
    }

    /// Registry of the types listed in the settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.audited_types.iter().cloned())
    }

    /// Registry of bare type names with no declared fields
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names.into_iter().map(AuditedType::new))
    }
}

impl TypeRegistry for StaticTypeRegistry {
    fn is_auditable(&self, entity_type: &str) -> bool {
        self.types.contains_key(entity_type)
    }

    fn list_auditable_types(&self) -> Vec<String> {
        self.types.keys().cloned().collect()
    }

    fn schema_for(&self, entity_type: &str) -> Option<EntitySchema> {
        self.types.get(entity_type).cloned().flatten()
    }
}

/// Registry wrapper that computes the audited type set at most once
///
/// The set is filled on first use and never invalidated. Schema lookups are
/// passed through to the inner registry.
pub struct CachedTypeRegistry<R> {
    inner: R,
    types: OnceLock<BTreeSet<String>>,
}

impl<R: TypeRegistry> CachedTypeRegistry<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            types: OnceLock::new(),
        }
    }

    fn types(&self) -> &BTreeSet<String> {
        self.types.get_or_init(|| {
            let types: BTreeSet<String> =
                self.inner.list_auditable_types().into_iter().collect();
            debug!(count = types.len(), "Cached audited entity types");
            types
        })
    }
}

impl<R: TypeRegistry> TypeRegistry for CachedTypeRegistry<R> {
    fn is_auditable(&self, entity_type: &str) -> bool {
        self.types().contains(entity_type)
    }

    fn list_auditable_types(&self) -> Vec<String> {
        self.types().iter().cloned().collect()
    }

    fn schema_for(&self, entity_type: &str) -> Option<EntitySchema> {
        self.inner.schema_for(entity_type)
    }
}
