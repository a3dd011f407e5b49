//! Wire types for the search endpoint and their conversion to domain types.
//!
//! The API may send `current_price`, `original_price` and `rating` as numeric
//! text. These types accept both forms; the `convert_*` functions normalize
//! them into [`Decimal`](rust_decimal::Decimal) and `f64`.

use narxbot_core::{
    PriceError, Product, ProductId, SearchResult, StoreRef, WirePrice, normalize_optional_price,
    normalize_price,
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use tracing::warn;

/// Search response as delivered by the API.
#[derive(Debug, Deserialize)]
pub struct WireSearchResult {
    #[serde(default)]
    pub products: Vec<WireProduct>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub cheapest: Option<WireProduct>,
}

/// Product as delivered by the API.
#[derive(Debug, Deserialize)]
pub struct WireProduct {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub product_url: String,
    pub current_price: WirePrice,
    #[serde(default)]
    pub original_price: Option<WirePrice>,
    #[serde(default)]
    pub rating: Option<WirePrice>,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    pub store: StoreRef,
}

const fn default_in_stock() -> bool {
    true
}

/// Convert a wire product, normalizing its prices.
///
/// A malformed `original_price` or `rating` is logged and dropped to `None`.
/// A zero `original_price` means the store shows no original price.
///
/// # Errors
///
/// Returns `PriceError` if `current_price` is not numeric.
pub fn convert_product(wire: WireProduct) -> Result<Product, PriceError> {
    let current_price = normalize_price(&wire.current_price)?;
    let original_price = optional_or_warn(wire.id, "original_price", wire.original_price.as_ref())
        .filter(|price| !price.is_zero());
    let rating =
        optional_or_warn(wire.id, "rating", wire.rating.as_ref()).and_then(|r| r.to_f64());

    Ok(Product {
        id: wire.id,
        name: wire.name,
        category: wire.category,
        brand: wire.brand,
        image_url: wire.image_url,
        product_url: wire.product_url,
        current_price,
        original_price,
        rating,
        review_count: wire.review_count,
        in_stock: wire.in_stock,
        store: wire.store,
    })
}

fn optional_or_warn(id: ProductId, field: &str, value: Option<&WirePrice>) -> Option<Decimal> {
    normalize_optional_price(value).unwrap_or_else(|e| {
        warn!(product_id = %id, field, error = %e, "Ignoring malformed price field");
        None
    })
}

/// Convert a wire product, logging and discarding it if its price is unusable.
fn convert_or_skip(wire: WireProduct) -> Option<Product> {
    let id = wire.id;
    convert_product(wire)
        .inspect_err(|e| warn!(product_id = %id, error = %e, "Skipping product with invalid price"))
        .ok()
}

/// Convert a wire search result, normalizing every product and the cheapest offer.
///
/// Products whose `current_price` is not numeric are left out; the rest of
/// the page is kept. `total` is passed through as reported by the API.
#[must_use]
pub fn convert_search_result(wire: WireSearchResult) -> SearchResult {
    SearchResult {
        products: wire.products.into_iter().filter_map(convert_or_skip).collect(),
        total: wire.total,
        page: wire.page,
        per_page: wire.per_page,
        cheapest: wire.cheapest.and_then(convert_or_skip),
    }
}
