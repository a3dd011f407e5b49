//! Product and store types.
//!
//! Prices are held as [`Decimal`] and serialized as JSON numbers, so a
//! persisted product carries `"current_price": 1999.5` rather than text.
//! Deserialization accepts either form.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize, Serializer};

use super::id::{ProductId, StoreId};

/// The shop a product offer comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRef {
    pub id: StoreId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// A product offer from one store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub product_url: String,
    /// Current price in the store's currency (UZS).
    #[serde(serialize_with = "serialize_price")]
    pub current_price: Decimal,
    /// Price before discount, if the store shows one.
    #[serde(default, serialize_with = "serialize_optional_price")]
    pub original_price: Option<Decimal>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    pub store: StoreRef,
}

impl Product {
    /// Discount relative to the original price, in percent.
    ///
    /// Returns `None` when there is no original price or it is not above the
    /// current price.
    #[must_use]
    pub fn discount_percent(&self) -> Option<Decimal> {
        let original = self.original_price?;
        if original <= self.current_price || original.is_zero() {
            return None;
        }
        Some(((original - self.current_price) * Decimal::ONE_HUNDRED / original).round_dp(0))
    }
}

const fn default_in_stock() -> bool {
    true
}

fn serialize_price<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract().is_zero()
        && let Some(whole) = value.to_i64()
    {
        return serializer.serialize_i64(whole);
    }
    match value.to_f64() {
        Some(float) => serializer.serialize_f64(float),
        None => Err(serde::ser::Error::custom(format!(
            "price {value} is not representable as a JSON number"
        ))),
    }
}

#[allow(clippy::ref_option)] // signature required by serde's serialize_with
fn serialize_optional_price<S: Serializer>(
    value: &Option<Decimal>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(price) => serialize_price(price, serializer),
        None => serializer.serialize_none(),
    }
}
