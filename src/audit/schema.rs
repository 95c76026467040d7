//! Field schemas for audited entity types
//!
//! A schema is the ordered list of fields an entity type declares. Static
//! (type-level) and synthetic (generated) fields are carried for completeness
//! but never compared.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a field is declared on its entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Per-instance state
    #[default]
    Instance,
    /// Type-level state shared by all instances
    Static,
    /// Generated by tooling, not declared by hand
    Synthetic,
}

/// One declared field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default)]
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn instance(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Instance,
        }
    }

    pub fn is_comparable(&self) -> bool {
        self.kind == FieldKind::Instance
    }
}

/// Ordered field declarations of one entity type
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntitySchema {
    fields: Vec<FieldSpec>,
}

impl EntitySchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// Schema of plain instance fields, in the given order
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: names.into_iter().map(FieldSpec::instance).collect(),
        }
    }

    /// Derive a schema from snapshot contents
    ///
    /// Fields come in the current snapshot's member order, followed by
    /// members that only exist in the old snapshot.
    pub fn infer(current: &Value, old: Option<&Value>) -> Self {
        let mut names: Vec<String> = Vec::new();
        for snapshot in std::iter::once(current).chain(old) {
            if let Value::Object(map) = snapshot {
                for key in map.keys() {
                    if !names.iter().any(|n| n == key) {
                        names.push(key.clone());
                    }
                }
            }
        }
        Self::from_names(names)
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Names of the fields a diff compares, in declaration order
    pub fn comparable_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.is_comparable())
            .map(|f| f.name.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
