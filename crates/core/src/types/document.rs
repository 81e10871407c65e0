//! Raw content store documents.
//!
//! A [`Document`] is what the content store hands back: the system fields
//! `_id` and `_type` plus whatever other fields the schema defines. Typed
//! records such as [`crate::Product`] convert to and from it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::DocumentId;

/// A document as stored in the content store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document identifier (`_id`). Missing IDs deserialize as empty.
    #[serde(rename = "_id", default)]
    pub id: DocumentId,
    /// Schema type discriminator (`_type`).
    #[serde(rename = "_type", default)]
    pub doc_type: String,
    /// All remaining fields, including store metadata such as `_rev`.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// Create an empty document of the given type.
    #[must_use]
    pub fn new(id: DocumentId, doc_type: impl Into<String>) -> Self {
        Self {
            id,
            doc_type: doc_type.into(),
            fields: Map::new(),
        }
    }

    /// Set a field, returning the document for chaining.
    #[must_use]
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Get a field value by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Read a field as text.
    ///
    /// Strings are returned as-is, numbers and booleans in their JSON
    /// spelling, and anything else (missing, `null`, arrays, objects) as the
    /// empty string.
    #[must_use]
    pub fn text(&self, key: &str) -> String {
        match self.fields.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }
}
