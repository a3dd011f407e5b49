//! Narxbot Core - Shared types library.
//!
//! This crate provides the types shared by all Narxbot components:
//! - `client` - API client, storage and observable stores for the Mini App
//! - `cli` - Command-line front-end over the client
//!
//! # Architecture
//!
//! The core crate contains only types and pure conversions - no I/O, no
//! storage access, no HTTP clients. This keeps it lightweight and allows it to
//! be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, price normalization, users, products and search results

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
