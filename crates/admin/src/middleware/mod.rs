//! HTTP middleware stack for admin.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with in-memory store)
//! 4. Security headers (CSP, framing, referrer)
//! 5. Auth gate (`RequireSessionFlag` extractor on protected routes)

pub mod auth;
pub mod security_headers;
pub mod session;

pub use auth::{
    AuthCheck, AuthGateRejection, Authenticated, ENTRY_PATH, RequireSessionFlag, SessionFlag,
};
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
