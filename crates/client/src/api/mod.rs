//! HTTP client for the Narxbot API.
//!
//! This module provides:
//! - [`ApiClient`] for `GET`/`POST`/`PUT`/`DELETE` requests with JSON bodies
//! - [`QueryParams`] for building query strings with optional values
//! - [`ApiError`] describing why a request failed
//!
//! # Request flow
//!
//! 1. The URL is built from the configured base URL, the relative path and
//!    the present query parameters
//! 2. The bearer token is read from session storage (on every request)
//! 3. The request is sent once; there are no retries and no timeout
//! 4. Non-2xx responses become [`ApiError::Status`]; 2xx bodies are decoded

mod client;
mod error;
mod params;

pub use client::ApiClient;
pub use error::ApiError;
pub use params::QueryParams;
