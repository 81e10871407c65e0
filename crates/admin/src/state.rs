//! Application state shared across handlers.

use std::sync::Arc;

use crate::{config::AdminConfig, content::ContentStore};

/// Application state shared across all handlers.
///
/// Cheaply cloneable; everything lives behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    content: Arc<dyn ContentStore>,
}

impl AppState {
    /// Build state from configuration and a content store.
    #[must_use]
    pub fn new(config: AdminConfig, content: Arc<dyn ContentStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, content }),
        }
    }

    /// Get the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get the content store.
    #[must_use]
    pub fn content(&self) -> &dyn ContentStore {
        self.inner.content.as_ref()
    }
}
