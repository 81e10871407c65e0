//! Public entry, login and logout.
//!
//! There are no user accounts: one shared passphrase from configuration
//! unlocks the panel by setting the session login flag.

use askama::Template;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use secrecy::ExposeSecret;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tower_sessions::Session;
use tracing::instrument;

use crate::{
    components::sidebar::HOME_PATH,
    error::{AppError, render_or_log},
    filters,
    middleware::{AuthCheck, ENTRY_PATH, SessionFlag},
    state::AppState,
};

/// Shown when the passphrase does not match.
pub const INVALID_PASSPHRASE_MESSAGE: &str = "Invalid passphrase.";

/// Entry page template.
#[derive(Template)]
#[template(path = "auth/entry.html")]
struct EntryTemplate {
    error: Option<String>,
}

/// Login form input.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub passphrase: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(ENTRY_PATH, get(entry))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

/// Render the entry page, or skip it for visitors already logged in.
///
/// GET /
#[instrument(skip(session))]
async fn entry(session: Session) -> Response {
    if SessionFlag::new(&session).is_authenticated().await {
        return Redirect::to(HOME_PATH).into_response();
    }

    Html(render_or_log(&EntryTemplate { error: None })).into_response()
}

/// Check the passphrase and set the login flag.
///
/// POST /login
#[instrument(skip(state, session, form))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if !passphrase_matches(&form.passphrase, state.config().passphrase.expose_secret()) {
        tracing::warn!("Login rejected: invalid passphrase");
        let template = EntryTemplate {
            error: Some(INVALID_PASSPHRASE_MESSAGE.to_string()),
        };
        return Ok((StatusCode::UNAUTHORIZED, Html(render_or_log(&template))).into_response());
    }

    SessionFlag::new(&session).grant().await?;
    tracing::info!("Admin logged in");

    Ok(Redirect::to(HOME_PATH).into_response())
}

/// Clear the login flag and return to the entry page.
///
/// POST /logout
#[instrument(skip(session))]
async fn logout(session: Session) -> Redirect {
    if let Err(e) = SessionFlag::new(&session).revoke().await {
        tracing::warn!(error = %e, "Failed to clear login flag");
    }

    Redirect::to(ENTRY_PATH)
}

/// Constant-time comparison of the passphrases' SHA-256 digests.
fn passphrase_matches(given: &str, expected: &str) -> bool {
    let given = Sha256::digest(given.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    given
        .iter()
        .zip(expected.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passphrase_matches() {
        assert!(passphrase_matches("correct horse battery", "correct horse battery"));
        assert!(!passphrase_matches("correct horse", "correct horse battery"));
        assert!(!passphrase_matches("", "correct horse battery"));
        assert!(!passphrase_matches("Correct horse battery", "correct horse battery"));
    }

    #[test]
    fn test_entry_template_shows_error() {
        let html = EntryTemplate {
            error: Some(INVALID_PASSPHRASE_MESSAGE.to_string()),
        }
        .render()
        .unwrap_or_default();
        assert!(html.contains("Invalid passphrase."));
        assert!(html.contains(r#"action="/login""#));
    }
}
