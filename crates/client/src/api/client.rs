//! Narxbot API client.
//!
//! Thin JSON wrapper over `reqwest` that signs requests with the bearer token
//! found in session storage at call time.

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::storage::{KeyValueStorage, TOKEN_KEY};

use super::error::ApiError;
use super::params::QueryParams;

/// Narxbot API client.
///
/// Cheap to clone; clones share the HTTP connection pool and the session
/// storage handle.
///
/// The token is not cached: every request reads it from session
/// storage, so a logout takes effect on the very next request.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    session: Arc<dyn KeyValueStorage>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the API described by `config`.
    #[must_use]
    pub fn new(config: &ClientConfig, session: Arc<dyn KeyValueStorage>) -> Self {
        Self::with_http_client(reqwest::Client::new(), config.api_base_url(), session)
    }

    /// Create a client with a preconfigured `reqwest::Client`.
    ///
    /// `base_url` is the origin plus API prefix, e.g. `https://narxbot.uz/api/v1`.
    #[must_use]
    pub fn with_http_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        session: Arc<dyn KeyValueStorage>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url,
                session,
            }),
        }
    }

    /// Base URL every path is appended to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Build the full URL for `path` with the present `params` appended.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if the result is not a valid URL.
    pub fn build_url(&self, path: &str, params: &QueryParams) -> Result<Url, ApiError> {
        let separator = if path.starts_with('/') { "" } else { "/" };
        let mut url = Url::parse(&format!("{}{separator}{path}", self.inner.base_url))?;

        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params.present() {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Read the bearer token from session storage.
    ///
    /// A storage failure is logged and treated as "no token".
    fn bearer_token(&self) -> Option<String> {
        match self.inner.session.get_item(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read session token, sending request unsigned");
                None
            }
        }
    }

    /// Build a request without sending it.
    ///
    /// Every request declares a JSON content type; the `Authorization` header
    /// is added when session storage holds a token right now.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the body cannot be serialized
    /// or the token is not a valid header value.
    pub fn build_request<B>(
        &self,
        method: Method,
        path: &str,
        params: &QueryParams,
        body: Option<&B>,
    ) -> Result<reqwest::Request, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.build_url(path, params)?;

        let mut builder = self
            .inner
            .client
            .request(method, url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = self.bearer_token() {
            builder = builder.bearer_auth(token);
        }

        if let Some(body) = body {
            let json = serde_json::to_string(body).map_err(ApiError::Encode)?;
            builder = builder.body(json);
        }

        Ok(builder.build()?)
    }

    /// Send a request and decode a successful JSON response.
    #[instrument(skip_all, fields(method = %method, path = %path))]
    async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        params: &QueryParams,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.build_request(method, path, params, body)?;

        let response = self.inner.client.execute(request).await.map_err(|e| {
            warn!(error = %e, "API request failed without a response");
            ApiError::Transport(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "API returned an error status");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        debug!(status = status.as_u16(), bytes = text.len(), "API response received");

        // An empty 2xx body decodes like JSON `null` so `()` and `Option<T>` work.
        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(text).map_err(ApiError::Decode)
    }

    /// `GET` `path` with query parameters.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` on transport failure, non-2xx status or invalid JSON.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &QueryParams,
    ) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::GET, path, params, None).await
    }

    /// `POST` `body` as JSON to `path`.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` on transport failure, non-2xx status or invalid JSON.
    pub async fn post<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, &QueryParams::new(), body)
            .await
    }

    /// `PUT` `body` as JSON to `path`.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` on transport failure, non-2xx status or invalid JSON.
    pub async fn put<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, &QueryParams::new(), body)
            .await
    }

    /// `DELETE` `path`.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` on transport failure, non-2xx status or invalid JSON.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::DELETE, path, &QueryParams::new(), None)
            .await
    }
}
