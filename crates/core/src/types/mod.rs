//! Core types for Catalog Panel.
//!
//! This module provides type-safe wrappers for the content store's records.

pub mod document;
pub mod id;
pub mod price;
pub mod product;

pub use document::Document;
pub use id::DocumentId;
pub use price::Price;
pub use product::{FieldErrors, PRODUCT_DOCUMENT_TYPE, Product, ProductField};
