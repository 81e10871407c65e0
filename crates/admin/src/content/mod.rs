//! Content store access.
//!
//! The admin panel never owns product data - every record lives in an
//! external content store. Handlers and the product editor talk to it
//! through the [`ContentStore`] trait so the backend can be swapped:
//!
//! - [`SanityClient`] - Sanity HTTP API (GROQ queries, `createOrReplace`
//!   mutations)
//! - [`MemoryContentStore`] - in-process store with call counters and
//!   failure injection, used by tests
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_panel_admin::content::{ContentStore, SanityClient};
//! use catalog_panel_core::{DocumentId, PRODUCT_DOCUMENT_TYPE};
//!
//! let client = SanityClient::new(&config.sanity)?;
//! let doc = client
//!     .find_by_id(PRODUCT_DOCUMENT_TYPE, &DocumentId::new("p1"))
//!     .await?;
//! ```

mod memory;
mod sanity;

pub use memory::MemoryContentStore;
pub use sanity::SanityClient;

use async_trait::async_trait;
use catalog_panel_core::{Document, DocumentId};
use thiserror::Error;

/// Errors that can occur when talking to the content store.
#[derive(Debug, Error)]
pub enum ContentStoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The store answered with an error status.
    #[error("{}", format_api_error(*.status, .message.as_deref()))]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error description from the response body, if any.
        message: Option<String>,
    },

    /// The store could not be reached or refused the operation without
    /// further detail.
    #[error("Content store unavailable")]
    Unavailable,
}

impl ContentStoreError {
    /// Best-effort human-readable description of the failure.
    ///
    /// Returns `None` when the failure carries no description of its own.
    #[must_use]
    pub fn description(&self) -> Option<String> {
        match self {
            Self::Api { message: None, .. } | Self::Unavailable => None,
            Self::Api {
                message: Some(message),
                ..
            } if message.trim().is_empty() => None,
            Self::Api {
                message: Some(message),
                ..
            } => Some(message.clone()),
            other => Some(other.to_string()),
        }
    }
}

fn format_api_error(status: u16, message: Option<&str>) -> String {
    match message {
        Some(message) => format!("Content store error ({status}): {message}"),
        None => format!("Content store error ({status})"),
    }
}

/// Access to documents held in the content store.
///
/// Implementations must treat `upsert` as create-or-replace keyed by the
/// document ID: the stored document afterwards is exactly the one given.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch the document of `doc_type` whose ID equals `id`.
    ///
    /// Returns `Ok(None)` if no such document exists.
    async fn find_by_id(
        &self,
        doc_type: &str,
        id: &DocumentId,
    ) -> Result<Option<Document>, ContentStoreError>;

    /// Create the document if absent, or replace it entirely if present.
    ///
    /// Returns the document as stored.
    async fn upsert(&self, document: Document) -> Result<Document, ContentStoreError>;

    /// List all documents of `doc_type`.
    async fn list(&self, doc_type: &str) -> Result<Vec<Document>, ContentStoreError>;
}
