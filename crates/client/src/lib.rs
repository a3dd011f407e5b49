//! Narxbot Mini App client library.
//!
//! The data layer behind the Narxbot Telegram Mini App: a small HTTP client
//! for the price-comparison API plus three observable stores.
//!
//! # Modules
//!
//! - [`api`] - HTTP client with bearer-token injection
//! - [`config`] - Configuration loaded from the environment
//! - [`context`] - Wires the client and the stores together
//! - [`storage`] - Session and durable key/value storage
//! - [`stores`] - Auth, search and favorites state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod context;
pub mod storage;
pub mod stores;

pub use api::{ApiClient, ApiError, QueryParams};
pub use config::{ClientConfig, ConfigError};
pub use context::AppContext;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use stores::{
    AuthState, AuthStore, FavoritesStore, SEARCH_FAILED_MESSAGE, SearchQuery, SearchState,
    SearchStore,
};
