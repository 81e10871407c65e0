//! The product record edited in the admin panel.
//!
//! A [`Product`] is the admin's in-memory copy of a `products` document. It
//! is built from a store [`Document`], mutated field by field from form
//! input, validated, and written back whole.

use core::fmt;
use std::collections::BTreeMap;

use super::document::Document;
use super::id::DocumentId;
use super::price::Price;

/// Schema type of product documents in the content store.
pub const PRODUCT_DOCUMENT_TYPE: &str = "products";

/// Editable fields of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProductField {
    Name,
    Title,
    Slug,
    Price,
    Category,
    Description,
}

impl ProductField {
    /// All fields, in form order.
    pub const ALL: [Self; 6] = [
        Self::Name,
        Self::Title,
        Self::Slug,
        Self::Price,
        Self::Category,
        Self::Description,
    ];

    /// Fields that must be non-empty for a submit to go through.
    pub const REQUIRED: [Self; 5] = [
        Self::Name,
        Self::Title,
        Self::Slug,
        Self::Price,
        Self::Category,
    ];

    /// Field name as used in documents and form inputs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Title => "title",
            Self::Slug => "slug",
            Self::Price => "price",
            Self::Category => "category",
            Self::Description => "description",
        }
    }

    /// Human-readable label (`"Name"`, `"Price"`, ...).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Title => "Title",
            Self::Slug => "Slug",
            Self::Price => "Price",
            Self::Category => "Category",
            Self::Description => "Description",
        }
    }

    /// Validation message shown when the field is missing.
    #[must_use]
    pub fn required_message(self) -> String {
        format!("{} is required.", self.label())
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures keyed by field. Empty means valid.
pub type FieldErrors = BTreeMap<ProductField, String>;

/// A product record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Product {
    pub id: DocumentId,
    pub name: String,
    pub title: String,
    pub slug: String,
    pub price: Price,
    pub description: String,
    pub category: String,
}

impl Product {
    /// Build a product from a store document.
    ///
    /// Missing text fields default to the empty string and a missing price
    /// to zero. The stored price goes through the same coercion as typed
    /// input; the second element is `false` when the stored price was not
    /// numeric and had to be replaced by zero.
    #[must_use]
    pub fn from_document(document: &Document) -> (Self, bool) {
        let (price, price_usable) = Price::from_json(document.get(ProductField::Price.as_str()));
        let product = Self {
            id: document.id.clone(),
            name: document.text(ProductField::Name.as_str()),
            title: document.text(ProductField::Title.as_str()),
            slug: document.text(ProductField::Slug.as_str()),
            price,
            description: document.text(ProductField::Description.as_str()),
            category: document.text(ProductField::Category.as_str()),
        };
        (product, price_usable)
    }

    /// Convert into a full `products` document for a create-or-replace write.
    #[must_use]
    pub fn to_document(&self) -> Document {
        Document::new(self.id.clone(), PRODUCT_DOCUMENT_TYPE)
            .with_field(ProductField::Name.as_str(), self.name.clone())
            .with_field(ProductField::Title.as_str(), self.title.clone())
            .with_field(ProductField::Slug.as_str(), self.slug.clone())
            .with_field(ProductField::Price.as_str(), self.price.to_json())
            .with_field(ProductField::Description.as_str(), self.description.clone())
            .with_field(ProductField::Category.as_str(), self.category.clone())
    }

    /// Update one field from raw input text.
    ///
    /// Text fields take the value verbatim. `price` is coerced with
    /// [`Price::coerce`], so non-numeric input becomes zero rather than
    /// being rejected.
    pub fn set_field(&mut self, field: ProductField, value: &str) {
        match field {
            ProductField::Name => self.name = value.to_string(),
            ProductField::Title => self.title = value.to_string(),
            ProductField::Slug => self.slug = value.to_string(),
            ProductField::Price => self.price = Price::coerce(value),
            ProductField::Category => self.category = value.to_string(),
            ProductField::Description => self.description = value.to_string(),
        }
    }

    /// Current value of a field as form input text.
    #[must_use]
    pub fn field_value(&self, field: ProductField) -> String {
        match field {
            ProductField::Name => self.name.clone(),
            ProductField::Title => self.title.clone(),
            ProductField::Slug => self.slug.clone(),
            ProductField::Price => self.price.to_string(),
            ProductField::Category => self.category.clone(),
            ProductField::Description => self.description.clone(),
        }
    }

    /// Returns `true` if a required field holds no value.
    fn is_missing(&self, field: ProductField) -> bool {
        match field {
            ProductField::Price => self.price.is_zero(),
            _ => self.field_value(field).is_empty(),
        }
    }

    /// Check required fields.
    ///
    /// Every missing required field maps to `"<Field> is required."`. A zero
    /// price counts as missing. An empty map means the product is valid.
    #[must_use]
    pub fn validate(&self) -> FieldErrors {
        ProductField::REQUIRED
            .into_iter()
            .filter(|&field| self.is_missing(field))
            .map(|field| (field, field.required_message()))
            .collect()
    }
}
