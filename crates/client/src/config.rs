//! Client configuration.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `FULLSTACK_API_URL` - Base URL of the REST API (default: `http://localhost:8080/api`)

use std::time::Duration;

use url::Url;

use crate::error::ClientError;

/// Base URL used when `FULLSTACK_API_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Fixed per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// API client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash, e.g. `http://localhost:8080/api`.
    base_url: String,
    /// Per-request timeout.
    timeout: Duration,
}

impl ClientConfig {
    /// Build a configuration for `base_url` with the fixed 10 second timeout.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidBaseUrl` if `base_url` is not an absolute
    /// URL.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Url::parse(base_url).map_err(|source| ClientError::InvalidBaseUrl {
            url: base_url.to_owned(),
            source,
        })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            timeout: REQUEST_TIMEOUT,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidBaseUrl` if `FULLSTACK_API_URL` is set to
    /// something that is not a URL.
    pub fn from_env() -> Result<Self, ClientError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url =
            std::env::var("FULLSTACK_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        Self::new(&base_url)
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url_is_valid() {
        let config = ClientConfig::new(DEFAULT_BASE_URL).ok();
        assert_eq!(
            config.as_ref().map(ClientConfig::base_url),
            Some("http://localhost:8080/api")
        );
        assert_eq!(config.map(|c| c.timeout()), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = ClientConfig::new("http://api.example.com/api/").ok();
        assert_eq!(
            config.as_ref().map(ClientConfig::base_url),
            Some("http://api.example.com/api")
        );
    }

    #[test]
    fn test_relative_url_is_rejected() {
        assert!(matches!(
            ClientConfig::new("/api"),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
    }
}
