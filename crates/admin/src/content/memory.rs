//! In-process content store.
//!
//! Holds documents in a map keyed by ID and counts calls so tests can assert
//! how many reads and writes an operation issued. A failure can be injected
//! for every operation or for writes only, to exercise the error paths of
//! the editor and the list page.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use catalog_panel_core::{Document, DocumentId};

use super::{ContentStore, ContentStoreError};

/// Injected failure returned until cleared.
#[derive(Debug, Clone)]
struct Failure {
    status: u16,
    message: Option<String>,
    writes_only: bool,
}

/// Content store backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    documents: RwLock<BTreeMap<DocumentId, Document>>,
    failure: RwLock<Option<Failure>>,
    find_calls: AtomicUsize,
    upsert_calls: AtomicUsize,
    list_calls: AtomicUsize,
}

impl MemoryContentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given documents.
    #[must_use]
    pub fn with_documents(documents: impl IntoIterator<Item = Document>) -> Self {
        let documents = documents
            .into_iter()
            .map(|doc| (doc.id.clone(), doc))
            .collect();
        Self {
            documents: RwLock::new(documents),
            ..Self::default()
        }
    }

    /// Make every following operation fail with the given status.
    ///
    /// A `None` message produces an error without a description.
    pub async fn fail_with(&self, status: u16, message: Option<&str>) {
        *self.failure.write().await = Some(Failure {
            status,
            message: message.map(str::to_string),
            writes_only: false,
        });
    }

    /// Make every following `upsert` fail; reads keep working.
    pub async fn fail_writes_with(&self, status: u16, message: Option<&str>) {
        *self.failure.write().await = Some(Failure {
            status,
            message: message.map(str::to_string),
            writes_only: true,
        });
    }

    /// Stop injecting failures.
    pub async fn recover(&self) {
        *self.failure.write().await = None;
    }

    /// Get a stored document by ID, regardless of type.
    pub async fn get(&self, id: &DocumentId) -> Option<Document> {
        self.documents.read().await.get(id).cloned()
    }

    /// Number of `find_by_id` calls so far.
    #[must_use]
    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    /// Number of `upsert` calls so far.
    #[must_use]
    pub fn upsert_calls(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    /// Number of `list` calls so far.
    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    async fn check_failure(&self, write: bool) -> Result<(), ContentStoreError> {
        match self.failure.read().await.as_ref() {
            Some(failure) if write || !failure.writes_only => Err(ContentStoreError::Api {
                status: failure.status,
                message: failure.message.clone(),
            }),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn find_by_id(
        &self,
        doc_type: &str,
        id: &DocumentId,
    ) -> Result<Option<Document>, ContentStoreError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure(false).await?;

        Ok(self
            .documents
            .read()
            .await
            .get(id)
            .filter(|doc| doc.doc_type == doc_type)
            .cloned())
    }

    async fn upsert(&self, document: Document) -> Result<Document, ContentStoreError> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure(true).await?;

        self.documents
            .write()
            .await
            .insert(document.id.clone(), document.clone());
        Ok(document)
    }

    async fn list(&self, doc_type: &str) -> Result<Vec<Document>, ContentStoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure(false).await?;

        Ok(self
            .documents
            .read()
            .await
            .values()
            .filter(|doc| doc.doc_type == doc_type)
            .cloned()
            .collect())
    }
}
