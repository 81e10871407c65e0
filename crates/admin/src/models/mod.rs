//! Session-held state for admin.
//!
//! The admin keeps no domain data of its own; product records live in the
//! content store. What remains is the small amount of state carried in the
//! visitor's session between requests.

pub mod session;

pub use session::{LOGGED_IN_MARKER, Notice, keys as session_keys};
