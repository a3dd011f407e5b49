//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `NARXBOT_API_ORIGIN` - Origin serving the API (e.g., `https://narxbot.uz`)
//!
//! ## Optional
//! - `NARXBOT_API_PREFIX` - Versioned API prefix (default: /api/v1)
//! - `NARXBOT_DATA_DIR` - Directory for durable storage (default: .narxbot)
//! - `NARXBOT_INIT_DATA` - Telegram init data to authenticate with
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default versioned API prefix.
pub const DEFAULT_API_PREFIX: &str = "/api/v1";

/// Default directory for durable storage, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = ".narxbot";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Mini App client configuration.
///
/// Implements `Debug` manually to redact the init data.
#[derive(Clone)]
pub struct ClientConfig {
    /// Origin the API is served from
    pub api_origin: Url,
    /// Versioned prefix prepended to every API path
    pub api_prefix: String,
    /// Directory holding durable (local) storage
    pub data_dir: PathBuf,
    /// Telegram init data used when no other is supplied
    pub init_data: Option<SecretString>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_origin", &self.api_origin.as_str())
            .field("api_prefix", &self.api_prefix)
            .field("data_dir", &self.data_dir)
            .field("init_data", &self.init_data.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_dsn", &self.sentry_dsn)
            .finish()
    }
}

impl ClientConfig {
    /// Create a configuration for the given API origin with default settings.
    #[must_use]
    pub fn new(api_origin: Url) -> Self {
        Self {
            api_origin,
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            init_data: None,
            sentry_dsn: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_origin = parse_origin(&get_required_env("NARXBOT_API_ORIGIN")?)
            .map_err(|e| ConfigError::InvalidEnvVar("NARXBOT_API_ORIGIN".to_string(), e))?;
        let api_prefix = validate_prefix(&get_env_or_default("NARXBOT_API_PREFIX", DEFAULT_API_PREFIX))
            .map_err(|e| ConfigError::InvalidEnvVar("NARXBOT_API_PREFIX".to_string(), e))?;
        let data_dir = PathBuf::from(get_env_or_default("NARXBOT_DATA_DIR", DEFAULT_DATA_DIR));
        let init_data = get_optional_env("NARXBOT_INIT_DATA").map(SecretString::from);
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            api_origin,
            api_prefix,
            data_dir,
            init_data,
            sentry_dsn,
        })
    }

    /// Set the API prefix.
    #[must_use]
    pub fn with_api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into();
        self
    }

    /// Set the durable storage directory.
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Base URL every API path is appended to (origin + prefix, no trailing slash).
    #[must_use]
    pub fn api_base_url(&self) -> String {
        let origin = self.api_origin.as_str().trim_end_matches('/');
        let prefix = self.api_prefix.trim_end_matches('/');
        format!("{origin}{prefix}")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an API origin; only http(s) URLs are accepted.
fn parse_origin(value: &str) -> Result<Url, String> {
    let url = Url::parse(value.trim()).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme '{other}', expected http or https")),
    }
}

/// Validate an API prefix: must be empty or start with `/`.
fn validate_prefix(value: &str) -> Result<String, String> {
    let value = value.trim();
    if value.is_empty() || value.starts_with('/') {
        Ok(value.to_string())
    } else {
        Err(format!("must start with '/' (got '{value}')"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origin_accepts_https() {
        let url = parse_origin("https://narxbot.example").unwrap();
        assert_eq!(url.host_str(), Some("narxbot.example"));
    }

    #[test]
    fn test_parse_origin_rejects_other_schemes() {
        assert!(parse_origin("ftp://narxbot.example").is_err());
        assert!(parse_origin("not a url").is_err());
    }

    #[test]
    fn test_validate_prefix() {
        assert_eq!(validate_prefix("/api/v2").unwrap(), "/api/v2");
        assert_eq!(validate_prefix("").unwrap(), "");
        assert!(validate_prefix("api/v1").is_err());
    }

    #[test]
    fn test_api_base_url_joins_origin_and_prefix() {
        let config = ClientConfig::new(Url::parse("https://narxbot.example").unwrap());
        assert_eq!(config.api_base_url(), "https://narxbot.example/api/v1");

        let config = ClientConfig::new(Url::parse("http://127.0.0.1:8080/app/").unwrap())
            .with_api_prefix("/api/v2/");
        assert_eq!(config.api_base_url(), "http://127.0.0.1:8080/app/api/v2");
    }

    #[test]
    fn test_config_debug_redacts_init_data() {
        let mut config = ClientConfig::new(Url::parse("https://narxbot.example").unwrap());
        config.init_data = Some(SecretString::from("query_id=AAH&hash=super_secret_hash"));

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("narxbot.example"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_hash"));
    }
}
