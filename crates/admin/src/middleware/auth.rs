//! Authentication gate for admin.
//!
//! Login state is a single flag in the session: the key `adminLoggedIn`
//! holding the string `"true"`. It is a UI gate, not a credential. View code
//! only sees the [`AuthCheck`] capability, so the flag can later be replaced
//! by a server-validated token without touching handlers.

use std::future::Future;

use axum::{
    extract::FromRequestParts,
    http::{HeaderName, StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use serde_json::Value;
use tower_sessions::Session;

use crate::models::{LOGGED_IN_MARKER, session_keys};

/// Public entry route unauthenticated visitors are sent to.
pub const ENTRY_PATH: &str = "/";

/// Header set by HTMX on fragment requests.
const HX_REQUEST: HeaderName = HeaderName::from_static("hx-request");

/// Header telling HTMX to perform a full-page client-side redirect.
const HX_REDIRECT: HeaderName = HeaderName::from_static("hx-redirect");

/// Capability answering "is the current visitor logged in?".
pub trait AuthCheck {
    /// Returns `true` if the visitor is authenticated.
    fn is_authenticated(&self) -> impl Future<Output = bool> + Send;
}

/// Returns `true` only for the exact logged-in marker string.
///
/// Missing flags, `"false"`, booleans and any other value are treated as
/// "not logged in".
#[must_use]
pub fn is_logged_in_marker(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::String(s)) if s == LOGGED_IN_MARKER)
}

/// The login flag stored in a visitor's session.
#[derive(Debug, Clone, Copy)]
pub struct SessionFlag<'a> {
    session: &'a Session,
}

impl<'a> SessionFlag<'a> {
    /// Wrap a session.
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Mark the visitor as logged in.
    ///
    /// Cycles the session ID first so a pre-login cookie cannot be reused.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn grant(&self) -> Result<(), tower_sessions::session::Error> {
        self.session.cycle_id().await?;
        self.session
            .insert(session_keys::ADMIN_LOGGED_IN, LOGGED_IN_MARKER)
            .await
    }

    /// Remove the flag (logout). Removing an absent flag is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn revoke(&self) -> Result<(), tower_sessions::session::Error> {
        self.session
            .remove_value(session_keys::ADMIN_LOGGED_IN)
            .await?;
        Ok(())
    }
}

impl AuthCheck for SessionFlag<'_> {
    async fn is_authenticated(&self) -> bool {
        match self.session.get_value(session_keys::ADMIN_LOGGED_IN).await {
            Ok(value) => is_logged_in_marker(value.as_ref()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read login flag from session");
                false
            }
        }
    }
}

/// Proof that the auth gate admitted the current request.
///
/// Only the gate can construct it; operations that must not run for
/// anonymous visitors take it as an argument.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated {
    _private: (),
}

impl Authenticated {
    pub(crate) const fn confirmed() -> Self {
        Self { _private: () }
    }
}

/// Extractor that requires the login flag.
///
/// If the flag is not set, the handler never runs: full-page requests are
/// redirected to the entry page and HTMX fragment requests get an
/// `HX-Redirect` header with an empty body.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireSessionFlag(gate): RequireSessionFlag,
/// ) -> impl IntoResponse {
///     "only visible when logged in"
/// }
/// ```
pub struct RequireSessionFlag(pub Authenticated);

/// Response sent when the auth gate turns a request away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthGateRejection {
    /// Redirect to the entry page (full-page requests).
    RedirectToEntry,
    /// Ask HTMX to navigate to the entry page (fragment requests).
    HxRedirectToEntry,
}

impl IntoResponse for AuthGateRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToEntry => Redirect::to(ENTRY_PATH).into_response(),
            Self::HxRedirectToEntry => (StatusCode::OK, [(HX_REDIRECT, ENTRY_PATH)]).into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireSessionFlag
where
    S: Send + Sync,
{
    type Rejection = AuthGateRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let rejection = if parts.headers.contains_key(HX_REQUEST) {
            AuthGateRejection::HxRedirectToEntry
        } else {
            AuthGateRejection::RedirectToEntry
        };

        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts.extensions.get::<Session>().ok_or(rejection)?;

        if SessionFlag::new(session).is_authenticated().await {
            Ok(Self(Authenticated::confirmed()))
        } else {
            tracing::debug!(path = %parts.uri.path(), "Login flag missing, redirecting to entry");
            Err(rejection)
        }
    }
}
