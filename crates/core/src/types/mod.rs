//! Core types for Narxbot.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;
pub mod search;
pub mod user;

pub use id::*;
pub use price::{PriceError, WirePrice, normalize_optional_price, normalize_price};
pub use product::{Product, StoreRef};
pub use search::SearchResult;
pub use user::User;
