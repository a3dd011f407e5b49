//! Favorites commands.
//!
//! # Usage
//!
//! ```bash
//! narxbot favorites list
//! narxbot favorites add 42 --from-search "sut 1l"
//! narxbot favorites toggle 42 --from-search "sut 1l"
//! narxbot favorites remove 42
//! ```
//!
//! # Environment Variables
//!
//! - `NARXBOT_DATA_DIR` - Directory the favorites list is saved in

use narxbot_client::AppContext;
use narxbot_core::ProductId;

use super::search::{SearchCommandError, find_product, product_line};

/// Print the saved favorites in insertion order.
#[allow(clippy::print_stdout)]
pub fn list(ctx: &AppContext) {
    let favorites = ctx.favorites().favorites();
    if favorites.is_empty() {
        println!("No favorites yet");
        return;
    }
    for product in &favorites {
        println!("{}", product_line(product));
    }
}

/// Look the product up with a search and add it.
///
/// # Errors
///
/// Returns an error if the search fails or does not contain the product.
#[allow(clippy::print_stdout)]
pub async fn add(ctx: &AppContext, id: ProductId, query: String) -> Result<(), SearchCommandError> {
    let product = find_product(ctx, id, query).await?;
    let line = product_line(&product);
    ctx.favorites().add_favorite(product);
    println!("Added {line}");
    Ok(())
}

/// Remove the product with `id`.
#[allow(clippy::print_stdout)]
pub fn remove(ctx: &AppContext, id: ProductId) {
    let present = ctx.favorites().is_favorite(id);
    ctx.favorites().remove_favorite(id);
    if present {
        println!("Removed {id}");
    } else {
        println!("{id} was not a favorite");
    }
}

/// Remove the product if it is a favorite, otherwise look it up and add it.
///
/// # Errors
///
/// Returns an error if adding requires a search that fails or misses the product.
pub async fn toggle(
    ctx: &AppContext,
    id: ProductId,
    query: String,
) -> Result<(), SearchCommandError> {
    if ctx.favorites().is_favorite(id) {
        remove(ctx, id);
        Ok(())
    } else {
        add(ctx, id, query).await
    }
}
