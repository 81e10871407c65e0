//! Product editor: load, edit, validate and save one product record.
//!
//! The editor is a small state machine over [`EditorState`]. Handlers drive
//! it for the lifetime of a single request:
//!
//! ```text
//! Idle --load--> Loading --found--> Ready
//!                        \--missing/error--> LoadError
//! Ready --submit(valid)--> Submitting --ok--> (saved, handler redirects)
//!                                     \--err--> SubmitError
//! Ready --submit(invalid)--> Ready (with field errors)
//! ```
//!
//! Every operation issues at most one content store request.

use catalog_panel_core::{DocumentId, FieldErrors, PRODUCT_DOCUMENT_TYPE, Product, ProductField};
use tracing::instrument;

use crate::content::{ContentStore, ContentStoreError};
use crate::middleware::Authenticated;

/// Load result when the store has no product with the requested ID.
pub const NOT_FOUND_MESSAGE: &str = "Product not found.";

/// Prefix of the load error when the store reports a described failure.
pub const FETCH_ERROR_PREFIX: &str = "Error fetching product data: ";

/// Load error when the store failure carries no description.
pub const UNKNOWN_FETCH_ERROR_MESSAGE: &str =
    "An unknown error occurred while fetching product data.";

/// Page-level error shown when saving fails.
pub const SUBMIT_ERROR_MESSAGE: &str = "Error updating the product.";

/// One-shot notice shown on the product list after a successful save.
pub const SAVED_NOTICE: &str = "Product updated successfully!";

/// Where the editor is in its load/edit/save cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditorState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A load is in flight.
    Loading,
    /// The record is loaded and editable.
    Ready {
        product: Product,
        field_errors: FieldErrors,
    },
    /// The record could not be loaded. Nothing else is shown.
    LoadError { message: String },
    /// A save is in flight.
    Submitting { product: Product },
    /// The save failed; the form stays populated.
    SubmitError { product: Product, message: String },
}

impl EditorState {
    /// The in-memory product copy, if one is loaded.
    #[must_use]
    pub const fn product(&self) -> Option<&Product> {
        match self {
            Self::Ready { product, .. }
            | Self::Submitting { product }
            | Self::SubmitError { product, .. } => Some(product),
            Self::Idle | Self::Loading | Self::LoadError { .. } => None,
        }
    }
}

/// Result of [`ProductEditor::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The record was written; carries what the store returned.
    Saved(Product),
    /// Validation failed; no write was attempted.
    Invalid(FieldErrors),
    /// The write failed; the editor is in `SubmitError`.
    Failed,
    /// No record is loaded, or a save is already in flight.
    NotReady,
}

/// Editor bound to a content store.
pub struct ProductEditor<'a> {
    store: &'a dyn ContentStore,
    state: EditorState,
}

impl<'a> ProductEditor<'a> {
    /// Create an idle editor.
    #[must_use]
    pub fn new(store: &'a dyn ContentStore) -> Self {
        Self {
            store,
            state: EditorState::Idle,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &EditorState {
        &self.state
    }

    /// Consume the editor, returning its final state.
    #[must_use]
    pub fn into_state(self) -> EditorState {
        self.state
    }

    /// Load the product with `id`.
    ///
    /// Requires proof that the auth gate admitted the request. A blank ID
    /// leaves the editor idle and issues no query.
    #[instrument(skip(self, _gate), fields(product_id = %id))]
    pub async fn load(&mut self, _gate: &Authenticated, id: &DocumentId) -> &EditorState {
        if id.is_blank() {
            tracing::debug!("Blank product ID, nothing to load");
            return &self.state;
        }

        self.state = EditorState::Loading;

        self.state = match self.store.find_by_id(PRODUCT_DOCUMENT_TYPE, id).await {
            Ok(Some(document)) => {
                let (product, price_usable) = Product::from_document(&document);
                if !price_usable {
                    tracing::warn!(
                        stored_price = ?document.get(ProductField::Price.as_str()),
                        "Stored price is not numeric, loading as 0"
                    );
                }
                EditorState::Ready {
                    product,
                    field_errors: FieldErrors::new(),
                }
            }
            Ok(None) => {
                tracing::info!("Product not found");
                EditorState::LoadError {
                    message: NOT_FOUND_MESSAGE.to_string(),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch product");
                EditorState::LoadError {
                    message: load_error_message(&e),
                }
            }
        };

        &self.state
    }

    /// Update one field of the in-memory copy.
    ///
    /// Applies in `Ready` and `SubmitError`; ignored otherwise. Returns
    /// whether the change was applied. Price text is coerced, never
    /// rejected.
    pub fn field_change(&mut self, field: ProductField, value: &str) -> bool {
        match &mut self.state {
            EditorState::Ready { product, .. } | EditorState::SubmitError { product, .. } => {
                product.set_field(field, value);
                true
            }
            _ => false,
        }
    }

    /// Validate the in-memory copy. Empty when valid or when nothing is loaded.
    #[must_use]
    pub fn validate(&self) -> FieldErrors {
        self.state
            .product()
            .map(Product::validate)
            .unwrap_or_default()
    }

    /// Validate and, if valid, write the full record back to the store.
    ///
    /// Invalid input stays in `Ready` with the field errors and issues no
    /// write. A failed write moves to `SubmitError` with the form intact.
    #[instrument(skip(self))]
    pub async fn submit(&mut self) -> SubmitOutcome {
        let product = match std::mem::take(&mut self.state) {
            EditorState::Ready { product, .. } | EditorState::SubmitError { product, .. } => {
                product
            }
            other => {
                self.state = other;
                return SubmitOutcome::NotReady;
            }
        };

        let field_errors = product.validate();
        if !field_errors.is_empty() {
            tracing::debug!(errors = field_errors.len(), "Product failed validation");
            self.state = EditorState::Ready {
                product,
                field_errors: field_errors.clone(),
            };
            return SubmitOutcome::Invalid(field_errors);
        }

        self.state = EditorState::Submitting {
            product: product.clone(),
        };

        match self.store.upsert(product.to_document()).await {
            Ok(stored) => {
                let (saved, _) = Product::from_document(&stored);
                tracing::info!(product_id = %saved.id, "Product updated");
                self.state = EditorState::Ready {
                    product: saved.clone(),
                    field_errors: FieldErrors::new(),
                };
                SubmitOutcome::Saved(saved)
            }
            Err(e) => {
                let event_id = sentry::capture_error(&e);
                tracing::error!(
                    error = %e,
                    product_id = %product.id,
                    sentry_event_id = %event_id,
                    "Failed to update product"
                );
                self.state = EditorState::SubmitError {
                    product,
                    message: SUBMIT_ERROR_MESSAGE.to_string(),
                };
                SubmitOutcome::Failed
            }
        }
    }
}

/// Page text for a failed load.
fn load_error_message(error: &ContentStoreError) -> String {
    error.description().map_or_else(
        || UNKNOWN_FETCH_ERROR_MESSAGE.to_string(),
        |description| format!("{FETCH_ERROR_PREFIX}{description}"),
    )
}
