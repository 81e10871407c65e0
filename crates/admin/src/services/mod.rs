//! Business logic services for admin.
//!
//! # Services
//!
//! - `product_editor` - load, edit, validate and save a product record

pub mod product_editor;

pub use product_editor::{
    EditorState, NOT_FOUND_MESSAGE, ProductEditor, SAVED_NOTICE, SubmitOutcome,
};
