//! Search command.
//!
//! # Usage
//!
//! ```bash
//! narxbot search "sut 1l"
//! narxbot search "sut 1l" --page 2 --per-page 10
//! ```

use std::fmt::Write;

use narxbot_client::{AppContext, SearchQuery};
use narxbot_core::{Product, ProductId, SearchResult};
use secrecy::SecretString;
use thiserror::Error;
use tracing::warn;

/// Errors that can occur during a search.
#[derive(Debug, Error)]
pub enum SearchCommandError {
    /// The store reported a failed search; holds its user-facing message.
    #[error("{0}")]
    Failed(String),

    /// The search succeeded but did not return the requested product.
    #[error("Product {id} not found in results for {query:?}")]
    ProductNotFound { id: ProductId, query: String },
}

/// Run a search and print the results.
///
/// When `init_data` is given the search is signed; a rejected sign-in is
/// logged and the search continues anonymously.
///
/// # Errors
///
/// Returns `SearchCommandError::Failed` with the store's message if the search fails.
pub async fn run(
    ctx: &AppContext,
    query: String,
    page: Option<u32>,
    per_page: Option<u32>,
    init_data: Option<&SecretString>,
) -> Result<(), SearchCommandError> {
    if let Some(init_data) = init_data
        && let Err(e) = super::auth::sign_in(ctx, init_data).await
    {
        warn!(error = %e, "Searching without a session");
    }

    let mut search = SearchQuery::new(query);
    search.page = page;
    search.per_page = per_page;

    let result = execute(ctx, search).await?;
    print_result(&result);
    Ok(())
}

/// Run a search through the store and return its result.
///
/// # Errors
///
/// Returns `SearchCommandError::Failed` with the store's message if the search fails.
pub async fn execute(
    ctx: &AppContext,
    query: SearchQuery,
) -> Result<SearchResult, SearchCommandError> {
    ctx.search().search(query).await;

    let state = ctx.search().state();
    if let Some(message) = state.error {
        return Err(SearchCommandError::Failed(message));
    }
    Ok(state.results.unwrap_or_default())
}

/// Search for `query` and pick the product with `id` from the results.
///
/// # Errors
///
/// Returns an error if the search fails or does not contain the product.
pub async fn find_product(
    ctx: &AppContext,
    id: ProductId,
    query: String,
) -> Result<Product, SearchCommandError> {
    let result = execute(ctx, SearchQuery::new(query.clone())).await?;
    result
        .products
        .into_iter()
        .chain(result.cheapest)
        .find(|p| p.id == id)
        .ok_or(SearchCommandError::ProductNotFound { id, query })
}

/// Format one product as a single line.
#[must_use]
pub fn product_line(product: &Product) -> String {
    let mut line = format!(
        "[{}] {} - {} so'm @ {}",
        product.id, product.name, product.current_price, product.store.name
    );
    if let Some(percent) = product.discount_percent() {
        let _ = write!(line, " (-{percent}%)");
    }
    if !product.in_stock {
        line.push_str(" [out of stock]");
    }
    line
}

#[allow(clippy::print_stdout)]
fn print_result(result: &SearchResult) {
    if result.is_empty() {
        println!("No products found");
        return;
    }

    println!(
        "{} of {} products (page {}):",
        result.products.len(),
        result.total,
        result.page
    );
    for product in &result.products {
        println!("  {}", product_line(product));
    }
    if let Some(cheapest) = &result.cheapest {
        println!("Cheapest: {}", product_line(cheapest));
    }
}
