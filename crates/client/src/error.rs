//! Error types for the API client.

use thiserror::Error;

/// Errors returned by the API client.
///
/// Transport failures and non-2xx statuses are both `Http`; the client never
/// retries or reinterprets them.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed or the server answered with an error status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL could not be parsed.
    #[error("invalid base URL {url}: {source}")]
    InvalidBaseUrl {
        /// The rejected value.
        url: String,
        /// Parser error.
        source: url::ParseError,
    },
}

impl ClientError {
    /// HTTP status of the failed response, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Http(err) => err.status(),
            Self::InvalidBaseUrl { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_display() {
        let source = url::Url::parse("nope").err();
        let Some(source) = source else {
            panic!("expected a parse error");
        };
        let err = ClientError::InvalidBaseUrl {
            url: "nope".to_owned(),
            source,
        };
        assert!(err.to_string().starts_with("invalid base URL nope"));
        assert_eq!(err.status(), None);
    }
}
