//! Integration tests for the Narxbot Mini App client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p narxbot-integration-tests
//! ```
//!
//! Every test drives an [`AppContext`] against an in-process mock API, so no
//! network access or running backend is needed.
//!
//! # Test Categories
//!
//! - `auth_session` - Authentication and how the token reaches requests
//! - `search_flow` - Searches, paging and failure handling
//! - `favorites_persistence` - Favorites surviving a context rebuild

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::Path;
use std::sync::Arc;

use httpmock::MockServer;
use narxbot_client::{AppContext, ClientConfig, FileStorage, KeyValueStorage, MemoryStorage};
use serde_json::{Value, json};
use url::Url;

/// Mock API server plus the storages a context is built over.
pub struct TestContext {
    pub server: MockServer,
    pub session: MemoryStorage,
    pub data_dir: tempfile::TempDir,
}

impl TestContext {
    /// Start a mock server with empty storages.
    ///
    /// # Panics
    ///
    /// Panics if the temporary data directory cannot be created.
    pub async fn new() -> Self {
        Self {
            server: MockServer::start_async().await,
            session: MemoryStorage::new(),
            data_dir: tempfile::tempdir().expect("create temp data dir"),
        }
    }

    /// Configuration pointing at the mock server and the temporary data dir.
    ///
    /// # Panics
    ///
    /// Panics if the mock server URL is not a valid URL.
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        let origin = Url::parse(&self.server.base_url()).expect("mock server url");
        ClientConfig::new(origin).with_data_dir(self.data_dir.path())
    }

    /// Build a fresh context over the shared storages.
    ///
    /// Calling this twice simulates reopening the Mini App in the same
    /// session: the token and the favorites file are both still there.
    #[must_use]
    pub fn app(&self) -> AppContext {
        let session: Arc<dyn KeyValueStorage> = Arc::new(self.session.clone());
        let local: Arc<dyn KeyValueStorage> = Arc::new(FileStorage::new(self.data_dir.path()));
        AppContext::new(self.config(), session, local)
    }

    /// Durable storage directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.data_dir.path()
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// A product as the API sends it, with the price as text.
#[must_use]
pub fn wire_product(id: i64, name: &str, price: &str, store: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "category": "Sut mahsulotlari",
        "brand": null,
        "image_url": format!("https://cdn.example/{id}.jpg"),
        "product_url": format!("https://{store}.example/p/{id}"),
        "current_price": price,
        "original_price": null,
        "rating": null,
        "review_count": 0,
        "in_stock": true,
        "store": { "id": 1, "name": store, "slug": store.to_lowercase(), "logo_url": null }
    })
}

/// A search response body.
#[must_use]
pub fn search_body(products: &[Value], cheapest: Option<Value>) -> Value {
    json!({
        "products": products,
        "total": products.len(),
        "page": 1,
        "per_page": 20,
        "cheapest": cheapest,
    })
}

/// A successful authentication response body.
#[must_use]
pub fn auth_body(token: &str) -> Value {
    json!({
        "data": {
            "access_token": token,
            "user": {
                "id": 1,
                "telegram_id": 5_000_000_001_i64,
                "username": "dilnoza",
                "first_name": "Dilnoza",
                "last_name": "Karimova",
                "language_code": "uz"
            }
        }
    })
}
