//! Newtype ID for content store documents.
//!
//! Content store identifiers are opaque strings (e.g. `"p1"` or a generated
//! UUID). Wrapping them keeps document IDs from being mixed up with slugs or
//! other free-form strings that travel through the same handlers.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a document in the content store.
///
/// # Example
///
/// ```rust
/// # use catalog_panel_core::DocumentId;
/// let id = DocumentId::new("p1");
/// assert_eq!(id.as_str(), "p1");
/// assert!(!id.is_blank());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Create a new ID from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the ID is empty or whitespace only.
    ///
    /// A blank ID never identifies a stored document.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_ids() {
        assert!(DocumentId::default().is_blank());
        assert!(DocumentId::new("   ").is_blank());
        assert!(!DocumentId::new("p1").is_blank());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&DocumentId::new("p1")).unwrap();
        assert_eq!(json, "\"p1\"");

        let id: DocumentId = serde_json::from_str("\"abc-123\"").unwrap();
        assert_eq!(id, DocumentId::new("abc-123"));
    }
}
