//! Reading mesh JSON documents from disk.

use std::fmt;
use std::path::Path;

use serde_json::Value;

use crate::error::{IrError, Result};
use crate::mapper::map_fields;
use crate::MeshDescription;

/// JavaScript `typeof` classification of a JSON value.
///
/// Used for the per-key diagnostic dump of an input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKeyType {
    /// A JSON number.
    Number,
    /// A JSON string.
    String,
    /// `true` or `false`.
    Boolean,
    /// An object, an array, or `null`.
    Object,
}

impl JsonKeyType {
    /// Classify a JSON value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Bool(_) => Self::Boolean,
            Value::Null | Value::Array(_) | Value::Object(_) => Self::Object,
        }
    }

    /// The `typeof` string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Object => "object",
        }
    }

    /// Type of every top-level key of an object, in document order.
    ///
    /// Non-object values have no keys.
    pub fn of_keys(value: &Value) -> Vec<(String, JsonKeyType)> {
        value
            .as_object()
            .map(|obj| {
                obj.iter()
                    .map(|(k, v)| (k.clone(), Self::of(v)))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl fmt::Display for JsonKeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a JSON string into a generic value.
pub fn parse_json(text: &str) -> Result<Value> {
    Ok(serde_json::from_str(text)?)
}

/// Read a file and parse it as JSON.
pub fn load_json(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| IrError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("read {} bytes from {}", text.len(), path.display());
    parse_json(&text)
}

/// Read a file and map it straight into a [`MeshDescription`].
pub fn load_mesh_description(path: impl AsRef<Path>) -> Result<MeshDescription> {
    map_fields(&load_json(path)?)
}
