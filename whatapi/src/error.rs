//! Error types for the tracker API client.

use thiserror::Error;

/// Errors that can occur when interacting with the tracker API.
#[derive(Debug, Error)]
pub enum WhatError {
    /// HTTP transport error (connection refused, timeout, TLS failure, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with something other than `200 OK`.
    #[error("request failed: status code {status}")]
    Status {
        /// Status line text, e.g. `502 Bad Gateway`.
        status: String,
    },

    /// A request was dispatched before a successful login.
    #[error("authentication required: log in first")]
    AuthenticationRequired,

    /// The login form was posted but the server did not redirect to the
    /// index page.
    #[error("login failed")]
    LoginFailed,

    /// The response envelope carried a non-`success` status.
    ///
    /// `message` is the server's `error` field verbatim, e.g.
    /// `bad id parameter`.
    #[error("API error: {message}")]
    Api {
        /// Human-readable error message from the API.
        message: String,
    },

    /// The payload did not match the requested shape, even after quirk
    /// correction.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The backing store failed to read or write.
    #[error("cache error: {0}")]
    Cache(#[from] rusqlite::Error),

    /// A cache write touched an unexpected number of rows.
    #[error("cache write affected {rows} rows, expected 1")]
    CacheIntegrity {
        /// Rows reported by the statement.
        rows: usize,
    },

    /// The cookie jar could not be serialized for storage.
    #[error("cookie serialization failed: {0}")]
    Cookie(serde_json::Error),

    /// A base URL or request URL could not be built.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// File I/O error (database directory creation).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for other errors (e.g. missing cache directory).
    #[error("{0}")]
    Other(String),
}

/// Convenience alias for `Result<T, WhatError>`.
pub type Result<T> = std::result::Result<T, WhatError>;
