//! Application context wiring the API client and the stores together.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::storage::{FileStorage, KeyValueStorage, MemoryStorage};
use crate::stores::{AuthStore, FavoritesStore, SearchStore};

/// Everything a front-end needs, built once per session.
///
/// The API client and the auth store share the same session storage, so a
/// token set by [`AuthStore::authenticate`] is sent with the next request and
/// [`AuthStore::logout`] stops it immediately.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppContext {
    inner: Arc<AppContextInner>,
}

struct AppContextInner {
    config: ClientConfig,
    api: ApiClient,
    auth: AuthStore,
    search: SearchStore,
    favorites: FavoritesStore,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("config", &self.inner.config)
            .field("auth", &self.inner.auth)
            .field("favorites", &self.inner.favorites)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Create a context over explicit storages.
    ///
    /// # Arguments
    ///
    /// * `config` - Client configuration
    /// * `session` - Storage for the bearer token
    /// * `local` - Durable storage for favorites
    #[must_use]
    pub fn new(
        config: ClientConfig,
        session: Arc<dyn KeyValueStorage>,
        local: Arc<dyn KeyValueStorage>,
    ) -> Self {
        let api = ApiClient::new(&config, Arc::clone(&session));
        let auth = AuthStore::new(api.clone(), session);
        let search = SearchStore::new(api.clone());
        let favorites = FavoritesStore::new(local);

        Self {
            inner: Arc::new(AppContextInner {
                config,
                api,
                auth,
                search,
                favorites,
            }),
        }
    }

    /// Create a context with in-memory session storage and favorites kept in
    /// `config.data_dir`.
    #[must_use]
    pub fn from_config(config: ClientConfig) -> Self {
        let session: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        let local: Arc<dyn KeyValueStorage> = Arc::new(FileStorage::new(config.data_dir.clone()));
        Self::new(config, session, local)
    }

    /// Get a reference to the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get a reference to the API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the auth store.
    #[must_use]
    pub fn auth(&self) -> &AuthStore {
        &self.inner.auth
    }

    /// Get a reference to the search store.
    #[must_use]
    pub fn search(&self) -> &SearchStore {
        &self.inner.search
    }

    /// Get a reference to the favorites store.
    #[must_use]
    pub fn favorites(&self) -> &FavoritesStore {
        &self.inner.favorites
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use url::Url;

    use super::*;

    #[test]
    fn test_api_uses_configured_base_url() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::new(Url::parse("https://narxbot.uz").unwrap())
            .with_data_dir(dir.path());
        let ctx = AppContext::from_config(config);

        assert_eq!(ctx.api().base_url(), "https://narxbot.uz/api/v1");
        assert!(!ctx.auth().is_authenticated());
        assert!(ctx.favorites().is_empty());
        assert_eq!(ctx.search().state().results, None);
    }

    #[test]
    fn test_favorites_reload_from_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let local = FileStorage::new(dir.path());
        local
            .set_item(
                crate::storage::FAVORITES_KEY,
                r#"[{"id":5,"name":"Non","product_url":"https://shop.example/p/5","current_price":4000,"store":{"id":1,"name":"Makro"}}]"#,
            )
            .unwrap();

        let config = ClientConfig::new(Url::parse("https://narxbot.uz").unwrap())
            .with_data_dir(dir.path());
        let ctx = AppContext::from_config(config);

        assert_eq!(ctx.favorites().len(), 1);
        assert!(ctx.favorites().is_favorite(narxbot_core::ProductId::new(5)));
    }
}
