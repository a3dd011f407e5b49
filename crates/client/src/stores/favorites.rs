//! Favorites store.
//!
//! Keeps the products the user marked as favorite, in insertion order, and
//! mirrors the whole list to local storage after every change.

use std::collections::HashSet;
use std::sync::Arc;

use narxbot_core::{Product, ProductId};
use tokio::sync::watch;
use tracing::{debug, error, instrument, warn};

use crate::storage::{FAVORITES_KEY, KeyValueStorage};

/// Store holding the favorite products.
///
/// Product ids are unique within the list. Persistence failures never reach
/// the caller; the in-memory list stays authoritative for the session.
#[derive(Clone)]
pub struct FavoritesStore {
    inner: Arc<FavoritesStoreInner>,
}

struct FavoritesStoreInner {
    storage: Arc<dyn KeyValueStorage>,
    favorites: watch::Sender<Vec<Product>>,
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl FavoritesStore {
    /// Create the store, loading any list previously saved in `storage`.
    ///
    /// A missing, empty or unreadable entry starts the store empty.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let initial = load(storage.as_ref());
        let (favorites, _) = watch::channel(initial);
        Self {
            inner: Arc::new(FavoritesStoreInner { storage, favorites }),
        }
    }

    /// Append `product` unless a product with the same id is already present.
    #[instrument(skip_all, fields(product_id = %product.id))]
    pub fn add_favorite(&self, product: Product) {
        let added = self.inner.favorites.send_if_modified(|list| {
            if list.iter().any(|p| p.id == product.id) {
                return false;
            }
            list.push(product);
            true
        });

        if added {
            self.persist();
        } else {
            debug!("Already a favorite");
        }
    }

    /// Remove the product with `id`, if present. The list is saved either way.
    #[instrument(skip(self))]
    pub fn remove_favorite(&self, id: ProductId) {
        self.inner.favorites.send_if_modified(|list| {
            let before = list.len();
            list.retain(|p| p.id != id);
            list.len() != before
        });
        self.persist();
    }

    /// Remove `product` if it is a favorite, add it otherwise.
    pub fn toggle_favorite(&self, product: Product) {
        if self.is_favorite(product.id) {
            self.remove_favorite(product.id);
        } else {
            self.add_favorite(product);
        }
    }

    /// Whether a product with `id` is a favorite.
    #[must_use]
    pub fn is_favorite(&self, id: ProductId) -> bool {
        self.inner.favorites.borrow().iter().any(|p| p.id == id)
    }

    /// Snapshot of the list, in insertion order.
    #[must_use]
    pub fn favorites(&self) -> Vec<Product> {
        self.inner.favorites.borrow().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.favorites.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.favorites.borrow().is_empty()
    }

    /// Receive every change to the list.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Product>> {
        self.inner.favorites.subscribe()
    }

    fn persist(&self) {
        let serialized = serde_json::to_string(&*self.inner.favorites.borrow());
        let json = match serialized {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "Failed to serialize favorites");
                return;
            }
        };

        if let Err(e) = self.inner.storage.set_item(FAVORITES_KEY, &json) {
            error!(error = %e, "Failed to save favorites");
        }
    }
}

fn load(storage: &dyn KeyValueStorage) -> Vec<Product> {
    let raw = match storage.get_item(FAVORITES_KEY) {
        Ok(Some(raw)) if !raw.trim().is_empty() => raw,
        Ok(_) => return Vec::new(),
        Err(e) => {
            error!(error = %e, "Failed to read favorites");
            return Vec::new();
        }
    };

    let products: Vec<Product> = match serde_json::from_str(&raw) {
        Ok(products) => products,
        Err(e) => {
            error!(error = %e, "Failed to load favorites");
            return Vec::new();
        }
    };

    let total = products.len();
    let mut seen = HashSet::with_capacity(total);
    let unique: Vec<Product> = products
        .into_iter()
        .filter(|p| seen.insert(p.id))
        .collect();

    if unique.len() != total {
        warn!(
            dropped = total - unique.len(),
            "Dropped duplicate favorites"
        );
    }
    debug!(count = unique.len(), "Loaded favorites");
    unique
}
