//! Field value reading for snapshots
//!
//! A snapshot exposes its fields through [`FieldSource`]. Every read is
//! isolated and returns either the canonical string rendering of the value
//! or a [`FieldReadError`].

use serde_json::Value;
use thiserror::Error;

/// Why a field could not be read from a snapshot
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldReadError {
    /// The snapshot has no named fields at all
    #[error("snapshot is {found}, not an object")]
    NotAnObject { found: &'static str },

    /// Access to the field is not permitted
    #[error("field '{field}' is not readable")]
    Restricted { field: String },
}

/// Anything that can hand out named field values as strings
pub trait FieldSource {
    /// Read one field and render it in its canonical string form
    fn read_field(&self, name: &str) -> Result<String, FieldReadError>;
}

impl<T: FieldSource + ?Sized> FieldSource for &T {
    fn read_field(&self, name: &str) -> Result<String, FieldReadError> {
        (**self).read_field(name)
    }
}

impl FieldSource for Value {
    fn read_field(&self, name: &str) -> Result<String, FieldReadError> {
        match self {
            // An absent member is a declared field that was never set
            Value::Object(map) => Ok(map
                .get(name)
                .map_or_else(|| "null".to_string(), render_value)),
            other => Err(FieldReadError::NotAnObject {
                found: kind_name(other),
            }),
        }
    }
}

/// Render a JSON value the way it is compared and displayed
///
/// Strings render without quotes and null renders as the literal `null`.
/// Arrays and objects render as compact JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
