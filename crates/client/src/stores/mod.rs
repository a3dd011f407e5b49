//! Observable state stores.
//!
//! Each store owns its state in a `tokio::sync::watch` channel: the store is
//! the single writer, consumers read snapshots or [`subscribe`] to be woken on
//! every change.
//!
//! - [`AuthStore`] - exchanges Telegram init data for a session token
//! - [`SearchStore`] - keyword search with loading and error state
//! - [`FavoritesStore`] - locally persisted list of chosen products
//!
//! Stores never hand structured errors to their consumers. Auth failures show
//! up as "not authenticated", search failures as a fixed message, and
//! favorites persistence failures are only logged.
//!
//! [`subscribe`]: AuthStore::subscribe

mod auth;
mod favorites;
mod search;

pub use auth::{AuthState, AuthStore};
pub use favorites::FavoritesStore;
pub use search::{SEARCH_FAILED_MESSAGE, SearchQuery, SearchState, SearchStore};
