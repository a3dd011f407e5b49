//! Key/value storage backing the stores.
//!
//! Mirrors the two browser storages the Mini App relies on:
//!
//! - **Session storage** holds the bearer token and dies with the session.
//!   [`MemoryStorage`] plays this role.
//! - **Local storage** holds the favorites list across sessions.
//!   [`FileStorage`] plays this role.
//!
//! Stores only see the [`KeyValueStorage`] trait, so tests and embedders can
//! swap either backend.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Session storage key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Local storage key holding the serialized favorites list.
pub const FAVORITES_KEY: &str = "narxbot_favorites";

/// Errors that can occur when reading or writing storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key contains characters the backend cannot store.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// A writer panicked while holding the lock.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// String key/value storage with browser `Storage` semantics.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
