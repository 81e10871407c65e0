//! Catalog Panel Core - Shared types library.
//!
//! This crate provides the record types used by the admin panel:
//! - `admin` - Login-gated product editor backed by a Sanity content store
//! - `integration-tests` - In-process tests of the admin router
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients, no sessions. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Document IDs, lenient prices, raw store documents and the
//!   validated product record

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
