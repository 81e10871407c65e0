//! Session middleware configuration for admin.
//!
//! Sets up in-memory sessions using tower-sessions. The session cookie is
//! the visitor's handle to the login flag; there is no flag expiry of its
//! own, so the cookie is kept as long as browsers allow.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::AdminConfig;

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "catalog_panel_session";

/// Session lifetime after the last request (browsers cap cookies at 400 days).
const SESSION_EXPIRY_DAYS: i64 = 400;

/// Create the session layer with an in-memory store.
///
/// Sessions do not survive a restart; visitors sign in again afterwards.
#[must_use]
pub fn create_session_layer(config: &AdminConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::days(SESSION_EXPIRY_DAYS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
