//! Product price with lenient text coercion.
//!
//! Prices arrive from two directions: typed into an HTML number input, and
//! read back from the content store where older documents may carry the price
//! as a string. Both paths go through [`Price::coerce`], which never fails -
//! input that is not a number becomes zero, and zero is what validation
//! treats as "missing".

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// A product price in the store's standard unit (e.g. dollars, not cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// The zero price (also the value of any non-numeric input).
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Coerce free-form text into a price.
    ///
    /// Accepts surrounding whitespace, plain decimals (`"19.99"`, `"-3"`) and
    /// scientific notation (`"1e3"`). Everything else, including the empty
    /// string and digit-grouped text such as `"1_000"`, yields
    /// [`Price::ZERO`].
    ///
    /// ```rust
    /// # use catalog_panel_core::Price;
    /// assert_eq!(Price::coerce("42").to_string(), "42");
    /// assert!(Price::coerce("abc").is_zero());
    /// ```
    #[must_use]
    pub fn coerce(input: &str) -> Self {
        let trimmed = input.trim();
        // Decimal parsing allows `_` separators; a number input never sends them
        if trimmed.is_empty() || trimmed.contains('_') {
            return Self::ZERO;
        }
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_or(Self::ZERO, |amount| Self(amount.normalize()))
    }

    /// Coerce a raw JSON value read from the content store.
    ///
    /// Returns the price and whether the stored value was usable as-is.
    /// Numbers and numeric strings are usable; `null` or a missing value is
    /// zero and also counts as usable. Anything else coerces to zero and is
    /// reported as unusable so the caller can log it. That includes numbers
    /// outside the decimal range, such as `1e30`.
    #[must_use]
    pub fn from_json(value: Option<&serde_json::Value>) -> (Self, bool) {
        match value {
            None | Some(serde_json::Value::Null) => (Self::ZERO, true),
            Some(serde_json::Value::Number(n)) => {
                let text = n.to_string();
                let price = Self::coerce(&text);
                (price, !price.is_zero() || is_zero_literal(&text))
            }
            Some(serde_json::Value::String(s)) => {
                let price = Self::coerce(s);
                (price, s.trim().is_empty() || !price.is_zero() || is_zero_literal(s))
            }
            Some(_) => (Self::ZERO, false),
        }
    }

    /// Returns the JSON number written to the content store.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        if self.0.fract().is_zero()
            && let Some(whole) = self.0.to_i64()
        {
            return serde_json::Value::from(whole);
        }
        self.0
            .to_f64()
            .and_then(serde_json::Number::from_f64)
            .map_or(serde_json::Value::from(0), serde_json::Value::Number)
    }

    /// Returns `true` for a zero price.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Format for display in listings (e.g. `"$19.99"`).
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.0)
    }
}

/// Returns `true` if the text spells zero (`"0"`, `"0.00"`, `"-0"`).
fn is_zero_literal(s: &str) -> bool {
    !s.contains('_') && Decimal::from_str(s.trim()).is_ok_and(|d| d.is_zero())
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
