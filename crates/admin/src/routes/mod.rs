//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Health check
//! GET  /static/*                  - Stylesheet
//!
//! # Auth (public)
//! GET  /                          - Entry page (passphrase form)
//! POST /login                     - Set the login flag
//! POST /logout                    - Clear the login flag
//!
//! # Dashboard
//! GET  /dashboard                 - Sidebar and empty card grid
//!
//! # Products (read/write to the content store)
//! GET  /product                   - Product listing
//! GET  /product/edit/{id}         - Loading placeholder
//! GET  /product/edit/{id}/form    - Editor form fragment (HTMX)
//! POST /product/edit/{id}         - Save the product
//! ```

use axum::{Router, routing::get};
use tower_http::services::ServeDir;

use crate::{
    middleware::{create_session_layer, security_headers_middleware},
    state::AppState,
};

pub mod auth;
pub mod dashboard;
pub mod products;

/// Directory holding the stylesheet served under `/static`.
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Build the page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        // Dashboard
        .route("/dashboard", get(dashboard::index))
        // Products
        .route(products::PRODUCT_LIST_PATH, get(products::index))
        .route(
            "/product/edit/{id}",
            get(products::edit).post(products::update),
        )
        .route("/product/edit/{id}/form", get(products::edit_form))
}

/// Build the complete application: pages, health, static files, sessions
/// and security headers.
///
/// Request tracing and Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(session_layer)
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the content store.
async fn health() -> &'static str {
    "ok"
}
