//! In-memory collection document.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// On-disk representation of a collection that has never been written.
pub const ABSENT_SENTINEL: &[u8] = b"null";

/// The shape a collection document currently has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Nothing has been written yet.
    Absent,
    /// An ordered list of records.
    Array,
    /// A string-keyed map.
    Map,
}

impl Shape {
    /// Human-readable name, used in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Shape::Absent => "absent",
            Shape::Array => "array",
            Shape::Map => "map",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The full content of one collection file.
///
/// A collection is exactly one of three shapes. `Absent` is kept distinct
/// from an empty array or map so callers can tell "never written" apart
/// from "cleared".
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Document {
    /// No data has ever been written.
    #[default]
    Absent,
    /// Array mode: ordered records.
    Array(Vec<Value>),
    /// Map mode: key to arbitrary value.
    Map(Map<String, Value>),
}

impl Document {
    /// Returns the current shape.
    #[must_use]
    pub fn shape(&self) -> Shape {
        match self {
            Document::Absent => Shape::Absent,
            Document::Array(_) => Shape::Array,
            Document::Map(_) => Shape::Map,
        }
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Document::Absent)
    }

    /// Number of records (array) or entries (map). Zero when absent.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Document::Absent => 0,
            Document::Array(items) => items.len(),
            Document::Map(map) => map.len(),
        }
    }

    /// Returns `true` when there are no records or entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the entries if the document is in map mode.
    #[must_use]
    pub fn as_map(&self) -> Option<&Map<String, Value>> {
        match self {
            Document::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Converts into a JSON value. `Absent` becomes `null`.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Document::Absent => Value::Null,
            Document::Array(items) => Value::Array(items),
            Document::Map(map) => Value::Object(map),
        }
    }

    /// Builds a document from a JSON value.
    ///
    /// Returns the value back unchanged if it is not `null`, an array or an object.
    pub fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Null => Ok(Document::Absent),
            Value::Array(items) => Ok(Document::Array(items)),
            Value::Object(map) => Ok(Document::Map(map)),
            other => Err(other),
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Document::Absent => serializer.serialize_unit(),
            Document::Array(items) => items.serialize(serializer),
            Document::Map(map) => map.serialize(serializer),
        }
    }
}

/// Name of a JSON value's type, for error messages.
#[must_use]
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
