//! Product list and product editor route handlers.
//!
//! The edit page is served in two steps: `GET /product/edit/{id}` returns a
//! full-screen loading placeholder, which then fetches
//! `GET /product/edit/{id}/form` over HTMX. The form fragment is where the
//! record is first loaded; a save loads it again so only an existing
//! product is ever written.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use catalog_panel_core::{
    DocumentId, FieldErrors, PRODUCT_DOCUMENT_TYPE, Product, ProductField,
};

use crate::{
    components::SidebarView,
    error::{AppError, render_or_log},
    filters,
    middleware::RequireSessionFlag,
    models::{Notice, session_keys},
    services::{EditorState, NOT_FOUND_MESSAGE, ProductEditor, SAVED_NOTICE, SubmitOutcome},
    state::AppState,
};

/// Path of the product list, also the target after a successful save.
pub const PRODUCT_LIST_PATH: &str = "/product";

/// Page text when the product list cannot be read.
pub const LIST_ERROR_MESSAGE: &str = "Error fetching products.";

// =============================================================================
// View Types
// =============================================================================

/// Product row for the list page.
#[derive(Debug, Clone)]
pub struct ProductRowView {
    pub name: String,
    pub title: String,
    pub slug: String,
    pub price: String,
    pub category: String,
    pub edit_href: String,
}

impl From<&Product> for ProductRowView {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            title: product.title.clone(),
            slug: product.slug.clone(),
            price: product.price.display(),
            category: product.category.clone(),
            edit_href: edit_path(&product.id),
        }
    }
}

/// One input of the edit form.
#[derive(Debug, Clone)]
pub struct FormFieldView {
    pub name: &'static str,
    pub input_type: &'static str,
    pub value: String,
    pub placeholder: String,
    pub error: Option<String>,
}

impl FormFieldView {
    fn new(product: &Product, field: ProductField, errors: &FieldErrors) -> Self {
        let input_type = match field {
            ProductField::Price => "number",
            ProductField::Description => "textarea",
            _ => "text",
        };
        Self {
            name: field.as_str(),
            input_type,
            value: product.field_value(field),
            placeholder: format!("Product {}", field.label()),
            error: errors.get(&field).cloned(),
        }
    }

    /// Returns `true` for multi-line inputs.
    #[must_use]
    pub fn is_textarea(&self) -> bool {
        self.input_type == "textarea"
    }
}

/// Build form inputs in display order: required fields, then description.
fn form_fields(product: &Product, errors: &FieldErrors) -> Vec<FormFieldView> {
    ProductField::ALL
        .into_iter()
        .map(|field| FormFieldView::new(product, field, errors))
        .collect()
}

fn edit_path(id: &DocumentId) -> String {
    format!("/product/edit/{id}")
}

// =============================================================================
// Templates
// =============================================================================

/// Product list page template.
#[derive(Template)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub sidebar: SidebarView,
    pub products: Vec<ProductRowView>,
    pub notice: Option<String>,
    pub error: Option<String>,
}

/// Full-screen placeholder shown while the editor loads.
#[derive(Template, WebTemplate)]
#[template(path = "products/loading.html")]
pub struct ProductLoadingTemplate {
    pub form_href: String,
}

/// Load failure: only the message is shown.
#[derive(Template)]
#[template(path = "products/load_error.html")]
pub struct ProductLoadErrorTemplate {
    pub message: String,
}

/// Load failure as a full page (after a submit).
#[derive(Template)]
#[template(path = "products/load_error_page.html")]
pub struct ProductLoadErrorPage {
    pub message: String,
}

/// Edit form as a full page (after a submit).
#[derive(Template)]
#[template(path = "products/edit.html")]
pub struct ProductEditTemplate {
    pub sidebar: SidebarView,
    pub action: String,
    pub fields: Vec<FormFieldView>,
    pub submit_error: Option<String>,
}

/// Edit form as a fragment swapped into the loading page.
#[derive(Template)]
#[template(path = "products/form.html")]
pub struct ProductEditFragment {
    pub sidebar: SidebarView,
    pub action: String,
    pub fields: Vec<FormFieldView>,
    pub submit_error: Option<String>,
}

impl ProductEditTemplate {
    fn new(product: &Product, errors: &FieldErrors, submit_error: Option<String>) -> Self {
        let action = edit_path(&product.id);
        Self {
            sidebar: SidebarView::new(action.clone()),
            action,
            fields: form_fields(product, errors),
            submit_error,
        }
    }

    fn into_fragment(self) -> ProductEditFragment {
        ProductEditFragment {
            sidebar: self.sidebar,
            action: self.action,
            fields: self.fields,
            submit_error: self.submit_error,
        }
    }
}

// =============================================================================
// Form Input
// =============================================================================

/// Submitted edit form. Absent inputs arrive as empty strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub name: String,
    pub title: String,
    pub slug: String,
    pub price: String,
    pub description: String,
    pub category: String,
}

impl ProductForm {
    fn value(&self, field: ProductField) -> &str {
        match field {
            ProductField::Name => &self.name,
            ProductField::Title => &self.title,
            ProductField::Slug => &self.slug,
            ProductField::Price => &self.price,
            ProductField::Category => &self.category,
            ProductField::Description => &self.description,
        }
    }

    /// Submitted values keyed by field.
    fn values(&self) -> impl Iterator<Item = (ProductField, &str)> {
        ProductField::ALL
            .into_iter()
            .map(move |field| (field, self.value(field)))
    }
}

/// Status for a load failure on a full-page response.
fn load_error_status(message: &str) -> StatusCode {
    if message == NOT_FOUND_MESSAGE {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::BAD_GATEWAY
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Product list page handler.
///
/// GET /product
#[instrument(skip(_gate, state, session))]
pub async fn index(
    RequireSessionFlag(_gate): RequireSessionFlag,
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    let notice = session
        .remove::<Notice>(session_keys::NOTICE)
        .await?
        .map(|notice| notice.message);

    let (products, error, status) = match state.content().list(PRODUCT_DOCUMENT_TYPE).await {
        Ok(documents) => {
            let products = documents
                .iter()
                .map(|doc| ProductRowView::from(&Product::from_document(doc).0))
                .collect();
            (products, None, StatusCode::OK)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch products");
            (
                vec![],
                Some(LIST_ERROR_MESSAGE.to_string()),
                StatusCode::BAD_GATEWAY,
            )
        }
    };

    let template = ProductsIndexTemplate {
        sidebar: SidebarView::new(PRODUCT_LIST_PATH),
        products,
        notice,
        error,
    };

    Ok((status, Html(render_or_log(&template))).into_response())
}

/// Edit page handler: the loading placeholder.
///
/// GET /product/edit/{id}
#[instrument(skip(_gate))]
pub async fn edit(
    RequireSessionFlag(_gate): RequireSessionFlag,
    Path(id): Path<String>,
) -> ProductLoadingTemplate {
    ProductLoadingTemplate {
        form_href: format!("{}/form", edit_path(&DocumentId::new(id))),
    }
}

/// Editor fragment handler: loads the record and renders the form.
///
/// GET /product/edit/{id}/form
#[instrument(skip(gate, state))]
pub async fn edit_form(
    RequireSessionFlag(gate): RequireSessionFlag,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let mut editor = ProductEditor::new(state.content());
    editor.load(&gate, &DocumentId::new(id)).await;

    match editor.into_state() {
        EditorState::Ready {
            product,
            field_errors,
        } => {
            let fragment = ProductEditTemplate::new(&product, &field_errors, None).into_fragment();
            Html(render_or_log(&fragment)).into_response()
        }
        // HTMX only swaps 2xx responses, so load errors are sent as 200
        EditorState::LoadError { message } => {
            Html(render_or_log(&ProductLoadErrorTemplate { message })).into_response()
        }
        // Blank ID: nothing to load
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Update handler: reloads the record, applies the submitted form and saves.
///
/// A product that cannot be loaded is never written.
///
/// POST /product/edit/{id}
#[instrument(skip(gate, state, session, form))]
pub async fn update(
    RequireSessionFlag(gate): RequireSessionFlag,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<ProductForm>,
) -> Result<Response, AppError> {
    let id = DocumentId::new(id);
    if id.is_blank() {
        return Err(AppError::BadRequest("Missing product ID".to_string()));
    }

    let mut editor = ProductEditor::new(state.content());
    match editor.load(&gate, &id).await {
        EditorState::Ready { .. } => {}
        EditorState::LoadError { message } => {
            let page = ProductLoadErrorPage {
                message: message.clone(),
            };
            return Ok((load_error_status(message), Html(render_or_log(&page))).into_response());
        }
        other => {
            return Err(AppError::Internal(format!(
                "Unexpected editor state after load: {other:?}"
            )));
        }
    }

    for (field, value) in form.values() {
        editor.field_change(field, value);
    }

    let outcome = editor.submit().await;

    let response = match (outcome, editor.into_state()) {
        (SubmitOutcome::Saved(_), _) => {
            session
                .insert(session_keys::NOTICE, Notice::new(SAVED_NOTICE))
                .await?;
            Redirect::to(PRODUCT_LIST_PATH).into_response()
        }
        (
            SubmitOutcome::Invalid(_),
            EditorState::Ready {
                product,
                field_errors,
            },
        ) => {
            let template = ProductEditTemplate::new(&product, &field_errors, None);
            (StatusCode::UNPROCESSABLE_ENTITY, Html(render_or_log(&template))).into_response()
        }
        (SubmitOutcome::Failed, EditorState::SubmitError { product, message }) => {
            let template = ProductEditTemplate::new(&product, &FieldErrors::new(), Some(message));
            (StatusCode::BAD_GATEWAY, Html(render_or_log(&template))).into_response()
        }
        (outcome, other) => {
            return Err(AppError::Internal(format!(
                "Unexpected editor state after submit: {outcome:?} / {other:?}"
            )));
        }
    };

    Ok(response)
}
