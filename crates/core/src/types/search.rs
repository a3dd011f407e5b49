//! Search results.

use serde::{Deserialize, Serialize};

use super::product::Product;

/// One page of search results plus the cheapest offer overall.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub products: Vec<Product>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub cheapest: Option<Product>,
}

impl SearchResult {
    /// Whether the search matched nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.cheapest.is_none()
    }
}
