//! Search store.
//!
//! Runs keyword searches against the API and keeps the latest result, the
//! loading flag and a user-facing error message.
//!
//! # Overlapping requests
//!
//! Searches are not cancelled. When two searches overlap, whichever resolves
//! last writes its outcome, and [`SearchStore::clear_results`] does not stop a
//! search that is already in flight.

mod conversions;

use std::sync::Arc;

use narxbot_core::SearchResult;
use tokio::sync::watch;
use tracing::{debug, error, instrument};

use self::conversions::{WireSearchResult, convert_search_result};
use crate::api::{ApiClient, ApiError, QueryParams};

/// Search endpoint.
const SEARCH_PATH: &str = "/search";

/// Message shown to the user when a search fails ("Search failed" in Uzbek).
pub const SEARCH_FAILED_MESSAGE: &str = "Qidirishda xatolik yuz berdi";

/// Parameters of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Search text.
    pub q: String,
    /// Page number; omitted from the request when `None`.
    pub page: Option<u32>,
    /// Page size; omitted from the request when `None`.
    pub per_page: Option<u32>,
}

impl SearchQuery {
    /// Search for `q` with the API's default paging.
    #[must_use]
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            page: None,
            per_page: None,
        }
    }

    /// Request a specific page.
    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Request a specific page size.
    #[must_use]
    pub const fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .with("q", Some(&self.q))
            .with("page", self.page)
            .with("per_page", self.per_page)
    }
}

/// Observable search state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    /// Latest successful result. Kept when a later search fails.
    pub results: Option<SearchResult>,
    /// A search is in flight.
    pub loading: bool,
    /// User-facing message for the last failed search.
    pub error: Option<String>,
    /// Text of the last search started.
    pub query: String,
}

/// Store holding search results.
#[derive(Clone)]
pub struct SearchStore {
    inner: Arc<SearchStoreInner>,
}

struct SearchStoreInner {
    api: ApiClient,
    state: watch::Sender<SearchState>,
}

impl std::fmt::Debug for SearchStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("SearchStore")
            .field("query", &state.query)
            .field("loading", &state.loading)
            .field("error", &state.error)
            .finish_non_exhaustive()
    }
}

impl SearchStore {
    /// Create an empty store.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            inner: Arc::new(SearchStoreInner { api, state }),
        }
    }

    /// Run a search.
    ///
    /// Sets `loading`, clears `error` and records the query text before the
    /// request. On success the normalized result replaces the previous one;
    /// products with an unusable price are left out. On a transport, status or
    /// decode failure `error` is set to [`SEARCH_FAILED_MESSAGE`] and the
    /// previous result is kept. `loading` is reset either way.
    #[instrument(skip(self), fields(q = %query.q))]
    pub async fn search(&self, query: SearchQuery) {
        self.inner.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
            state.query.clone_from(&query.q);
        });

        let outcome = self.fetch(&query).await;

        self.inner.state.send_modify(|state| {
            match outcome {
                Ok(result) => {
                    debug!(
                        products = result.products.len(),
                        total = result.total,
                        "Search completed"
                    );
                    state.results = Some(result);
                }
                Err(e) => {
                    error!(error = %e, "Search error");
                    state.error = Some(SEARCH_FAILED_MESSAGE.to_string());
                }
            }
            state.loading = false;
        });
    }

    async fn fetch(&self, query: &SearchQuery) -> Result<SearchResult, ApiError> {
        let wire: WireSearchResult = self
            .inner
            .api
            .get(SEARCH_PATH, &query.to_params())
            .await?;
        Ok(convert_search_result(wire))
    }

    /// Reset results, query and error. Does not cancel an in-flight search.
    pub fn clear_results(&self) {
        self.inner.state.send_modify(|state| {
            state.results = None;
            state.query.clear();
            state.error = None;
        });
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> SearchState {
        self.inner.state.borrow().clone()
    }

    /// Receive every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.state.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use httpmock::prelude::*;
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;
    use crate::storage::{KeyValueStorage, MemoryStorage};

    fn store_for(base_url: &str) -> SearchStore {
        let session: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        SearchStore::new(ApiClient::with_http_client(
            reqwest::Client::new(),
            base_url,
            session,
        ))
    }

    fn product(id: i64, price: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": "Sut 1L",
            "category": "Sut",
            "brand": null,
            "image_url": null,
            "product_url": format!("https://shop.example/p/{id}"),
            "current_price": price,
            "original_price": null,
            "rating": null,
            "review_count": 0,
            "in_stock": true,
            "store": { "id": 1, "name": "Korzinka", "slug": "korzinka", "logo_url": null }
        })
    }

    #[test]
    fn test_query_params_skip_absent_paging() {
        let params = SearchQuery::new("milk").to_params();
        let present: Vec<_> = params.present().collect();
        assert_eq!(present, vec![("q", "milk")]);

        let params = SearchQuery::new("milk").with_page(2).with_per_page(10).to_params();
        let present: Vec<_> = params.present().collect();
        assert_eq!(present, vec![("q", "milk"), ("page", "2"), ("per_page", "10")]);
    }

    #[tokio::test]
    async fn test_search_normalizes_prices() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/search")
                    .query_param("q", "milk");
                then.status(200).json_body(json!({
                    "products": [product(1, "1999.50"), product(2, "1500")],
                    "total": 2,
                    "page": 1,
                    "per_page": 20,
                    "cheapest": product(2, "1500")
                }));
            })
            .await;

        let store = store_for(&server.url("/api/v1"));
        store.search(SearchQuery::new("milk")).await;

        mock.assert_async().await;
        let state = store.state();
        assert!(!state.loading);
        assert_eq!(state.error, None);
        assert_eq!(state.query, "milk");

        let results = state.results.unwrap();
        assert_eq!(results.products[0].current_price, Decimal::new(19995, 1));
        assert_eq!(
            results.cheapest.unwrap().current_price,
            Decimal::from(1500)
        );
    }

    #[tokio::test]
    async fn test_failed_search_keeps_previous_results() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/search").query_param("q", "non");
                then.status(200).json_body(json!({
                    "products": [product(5, "4000")],
                    "total": 1,
                    "page": 1,
                    "per_page": 20,
                    "cheapest": null
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/search").query_param("q", "tuz");
                then.status(500);
            })
            .await;

        let store = store_for(&server.url("/api/v1"));
        store.search(SearchQuery::new("non")).await;
        let before = store.state().results;
        assert!(before.is_some());

        store.search(SearchQuery::new("tuz")).await;
        let state = store.state();
        assert_eq!(state.error.as_deref(), Some(SEARCH_FAILED_MESSAGE));
        assert!(!state.loading);
        assert_eq!(state.results, before);
        assert_eq!(state.query, "tuz");
    }

    #[tokio::test]
    async fn test_invalid_price_drops_only_that_product() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/search");
                then.status(200).json_body(json!({
                    "products": [product(1, "1500"), product(2, "1700"), product(3, "")],
                    "total": 3,
                    "page": 1,
                    "per_page": 20,
                    "cheapest": product(1, "1500")
                }));
            })
            .await;

        let store = store_for(&server.url("/api/v1"));
        store.search(SearchQuery::new("sut")).await;

        let state = store.state();
        assert_eq!(state.error, None);
        let results = state.results.unwrap();
        assert_eq!(results.products.len(), 2);
        assert_eq!(results.cheapest.unwrap().current_price, Decimal::from(1500));
    }

    #[tokio::test]
    async fn test_network_down() {
        let store = store_for("http://127.0.0.1:9/api/v1");
        store.search(SearchQuery::new("milk")).await;

        let state = store.state();
        assert_eq!(state.error.as_deref(), Some("Qidirishda xatolik yuz berdi"));
        assert!(!state.loading);
        assert_eq!(state.results, None);
    }

    #[tokio::test]
    async fn test_new_search_clears_previous_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/search");
                then.status(200)
                    .delay(std::time::Duration::from_millis(200))
                    .json_body(json!({ "products": [], "total": 0, "page": 1, "per_page": 20 }));
            })
            .await;

        let store = store_for(&server.url("/api/v1"));
        store.inner.state.send_modify(|state| {
            state.error = Some(SEARCH_FAILED_MESSAGE.to_string());
        });

        let mut changes = store.subscribe();
        let search = {
            let store = store.clone();
            tokio::spawn(async move { store.search(SearchQuery::new("milk")).await })
        };

        // The response is delayed, so the first change is the loading state
        changes.changed().await.unwrap();
        {
            let state = changes.borrow_and_update();
            assert!(state.loading);
            assert_eq!(state.error, None);
            assert_eq!(state.query, "milk");
        }

        search.await.unwrap();
        let state = store.state();
        assert!(!state.loading);
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_clear_results_resets_state() {
        let store = store_for("http://127.0.0.1:9/api/v1");
        store.inner.state.send_modify(|state| {
            state.query = "milk".to_string();
            state.error = Some(SEARCH_FAILED_MESSAGE.to_string());
            state.results = Some(SearchResult {
                products: Vec::new(),
                total: 0,
                page: 1,
                per_page: 20,
                cheapest: None,
            });
        });

        store.clear_results();

        let state = store.state();
        assert_eq!(state, SearchState::default());
    }
}
