//! ACS client error types.

use thiserror::Error;

use crate::config::ConfigError;

/// A result type using `AcsError`.
pub type Result<T> = std::result::Result<T, AcsError>;

/// Errors returned by ACS calls.
#[derive(Debug, Error)]
pub enum AcsError {
    /// The request never produced an HTTP response.
    #[error("request to {url} failed: {source}")]
    Http {
        /// The URL that was called.
        url: String,
        /// The transport error.
        #[source]
        source: reqwest::Error,
    },

    /// ACS answered with a non-success status.
    #[error("ACS returned HTTP {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// ACS error code, e.g. `404-object-not-found`.
        code: Option<String>,
        /// Error message from the body, or the status text.
        message: String,
    },

    /// A success response had an unexpected body.
    #[error("failed to decode ACS response: {source}")]
    Decode {
        /// The JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The client configuration is incomplete.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AcsError {
    /// An API error with the given status and message.
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            code: None,
            message: message.into(),
        }
    }

    /// The HTTP status, if ACS answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if ACS reported that the resource does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.status(), Some(404))
    }

    /// Returns `true` if the request was throttled or the service was
    /// temporarily unavailable.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self.status(), Some(429 | 503))
    }
}
