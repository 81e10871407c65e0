//! Session-related types for admin authentication.
//!
//! Values stored in the session for the login flag and one-shot notices.

use serde::{Deserialize, Serialize};

/// Value of the login flag when the visitor is logged in.
///
/// Any other value, including a missing one, means "not logged in".
pub const LOGGED_IN_MARKER: &str = "true";

/// One-shot confirmation shown on the next page that reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Message text.
    pub message: String,
}

impl Notice {
    /// Create a notice with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Session keys for admin state.
pub mod keys {
    /// Key for the login flag.
    pub const ADMIN_LOGGED_IN: &str = "adminLoggedIn";

    /// Key for a pending [`super::Notice`].
    pub const NOTICE: &str = "notice";
}
