//! Askama filters used by the panel templates.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use chrono::Datelike;

/// Footer year: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    Ok(chrono::Utc::now().year())
}

/// Product count for the list heading: `1 product`, `3 products`.
///
/// Usage in templates: `{{ products.len()|product_count }}`
#[askama::filter_fn]
pub fn product_count(count: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let count = count.to_string();
    let noun = if count == "1" { "product" } else { "products" };
    Ok(format!("{count} {noun}"))
}
