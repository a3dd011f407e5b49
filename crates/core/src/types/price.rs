//! Price normalization using decimal arithmetic.
//!
//! The search API delivers `current_price` and `original_price` either as JSON
//! numbers or as numeric text (`"1999.50"`). The in-memory model only ever
//! holds [`Decimal`] values; [`WirePrice`] captures what came over the wire and
//! the `normalize_*` functions turn it into a number.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while normalizing a wire price.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// The value is not a decimal number.
    #[error("invalid price value: {0:?}")]
    Invalid(String),
}

/// A price as delivered by the API: a JSON number or numeric text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WirePrice {
    Number(serde_json::Number),
    Text(String),
}

/// Normalize a required price.
///
/// Text is trimmed before parsing. Both plain (`"1500.00"`) and scientific
/// (`"1.5e3"`) notation are accepted.
///
/// # Errors
///
/// Returns `PriceError::Invalid` if the value is not numeric.
pub fn normalize_price(value: &WirePrice) -> Result<Decimal, PriceError> {
    match value {
        WirePrice::Number(number) => parse_decimal(&number.to_string()),
        WirePrice::Text(text) => parse_decimal(text.trim()),
    }
}

/// Normalize an optional price.
///
/// `None` stays `None`, and so does blank text: the API uses an empty string
/// for "no original price" on some stores.
///
/// # Errors
///
/// Returns `PriceError::Invalid` if a present value is not numeric.
pub fn normalize_optional_price(value: Option<&WirePrice>) -> Result<Option<Decimal>, PriceError> {
    match value {
        None => Ok(None),
        Some(WirePrice::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(value) => normalize_price(value).map(Some),
    }
}

fn parse_decimal(s: &str) -> Result<Decimal, PriceError> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .map(|d| d.normalize())
        .map_err(|_| PriceError::Invalid(s.to_string()))
}
