//! Client configuration.
//!
//! A [`Config`] names the tracker, the user agent sent with every request
//! and, optionally, the SQLite database used for the response cache and the
//! saved session cookies. Without a database every call reaches the network
//! and every login submits credentials.

use crate::error::{Result, WhatError};
use std::path::PathBuf;
use std::time::Duration;

/// User agent used when the caller does not supply one.
pub const DEFAULT_USER_AGENT: &str = concat!("whatapi/", env!("CARGO_PKG_VERSION"));

/// How long a cached response stays fresh unless configured otherwise.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Settings for [`Client::from_config`](crate::Client::from_config).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Tracker root, e.g. `https://orpheus.network/`.
    pub base_url: String,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
    /// Maximum age of a cached response.
    pub cache_ttl: Duration,
    /// SQLite file for the cache and cookies. `None` disables both.
    pub database: Option<PathBuf>,
}

impl Config {
    /// Configuration for `base_url` with default user agent and TTL and no
    /// persistent storage.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            cache_ttl: DEFAULT_CACHE_TTL,
            database: None,
        }
    }

    /// Enable the response cache and cookie persistence backed by `path`.
    #[must_use]
    pub fn with_database(mut self, path: impl Into<PathBuf>) -> Self {
        self.database = Some(path.into());
        self
    }

    /// `~/.cache/whatapi/whatapi.db` (platform equivalent).
    pub fn default_database_path() -> Result<PathBuf> {
        let cache = dirs::cache_dir()
            .ok_or_else(|| WhatError::Other("cannot determine cache directory".into()))?;
        Ok(cache.join("whatapi").join("whatapi.db"))
    }
}
