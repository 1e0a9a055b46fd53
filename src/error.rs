//! Error types for the Creeble client
//!
//! One tagged enum covers the whole taxonomy the API can produce. Retry
//! eligibility and caller-visible behavior (e.g. treating a 404 as "does not
//! exist") both branch on these variants, so classification happens exactly
//! once, in the transport.

use std::collections::HashMap;
use thiserror::Error;

/// The main error type for the Creeble client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // API-classified errors
    // ============================================================================
    /// HTTP 401 - the API key was missing or rejected
    #[error("authentication failed: {message}")]
    Unauthorized { message: String },

    /// HTTP 422 - the request payload failed server-side validation
    #[error("validation failed: {message}")]
    Validation {
        message: String,
        /// Field name -> list of validation messages
        errors: HashMap<String, Vec<String>>,
    },

    /// HTTP 429 - rate limited, with the server's Retry-After hint
    #[error("rate limited, retry after {retry_after_seconds}s")]
    RateLimited {
        message: String,
        retry_after_seconds: u64,
    },

    /// HTTP 5xx
    #[error("server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// Any other non-2xx status (404 included)
    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },

    // ============================================================================
    // Transport-level errors
    // ============================================================================
    /// The per-request deadline expired before a response arrived
    #[error("request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Connection-level or protocol-level failure from the HTTP stack
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Decode errors
    // ============================================================================
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// The response parsed but did not have the shape we needed
    #[error("unexpected response shape: {message}")]
    Decode { message: String },

    // ============================================================================
    // Client-side errors
    // ============================================================================
    /// Auto-select refused a traversal whose reported total exceeds the cap
    #[error("collection has {total} items, exceeding the {max_items} item cap")]
    CollectionTooLarge { total: u64, max_items: u64 },

    #[error("configuration error: {message}")]
    Config { message: String },
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a generic API status error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// The HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Unauthorized { .. } => Some(401),
            Error::Validation { .. } => Some(422),
            Error::RateLimited { .. } => Some(429),
            Error::Server { status, .. } | Error::Api { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the failure was a per-call deadline expiry
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Timeout { .. } => true,
            Error::Http(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// True when the failure happened below HTTP (connect refused, DNS, ...)
    ///
    /// Deliberately narrow: request-phase failures that are not
    /// connectivity (redirect policy, body errors) stay non-retryable.
    pub fn is_connect_error(&self) -> bool {
        match self {
            Error::Http(e) => e.is_connect(),
            _ => false,
        }
    }

    /// True when the API reported that the addressed record does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api { status: 404, .. })
    }
}

/// Result type alias for the Creeble client
pub type Result<T> = std::result::Result<T, Error>;
