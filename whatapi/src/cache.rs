//! Persistent response cache.
//!
//! Responses are stored per request URL in the `urlcache` table together
//! with the time they were fetched. A row older than the TTL, a row with an
//! empty body, and a missing row all read as a miss; callers simply fetch
//! again. Writes replace the previous row for the URL.
//!
//! The cache never decides correctness: a client without a database behaves
//! identically except that every request reaches the network.

use crate::error::{Result, WhatError};
use crate::store::Database;
use crate::transport::Transport;
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::Url;
use rusqlite::{OptionalExtension, params};
use std::time::Duration;
use tracing::debug;

/// URL → body store with time-based staleness.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    db: Database,
    ttl: TimeDelta,
}

impl ResponseCache {
    pub fn new(db: Database, ttl: Duration) -> Self {
        Self {
            db,
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
        }
    }

    /// Cached body for `url`, or `None` when absent or stale.
    pub fn get(&self, url: &str) -> Result<Option<Vec<u8>>> {
        let row: Option<(Vec<u8>, DateTime<Utc>)> = self
            .db
            .conn()
            .query_row(
                "SELECT body, fetched_at FROM urlcache WHERE requesturl = ?1",
                [url],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        Ok(match row {
            Some((body, fetched_at)) if !body.is_empty() && Utc::now() - fetched_at <= self.ttl => {
                Some(body)
            }
            _ => None,
        })
    }

    /// Store `body` for `url`, stamped now.
    pub fn put(&self, url: &str, body: &[u8]) -> Result<()> {
        self.put_at(url, body, Utc::now())
    }

    pub(crate) fn put_at(&self, url: &str, body: &[u8], fetched_at: DateTime<Utc>) -> Result<()> {
        let rows = self.db.conn().execute(
            "INSERT INTO urlcache (requesturl, body, fetched_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(requesturl) DO UPDATE
             SET body = excluded.body, fetched_at = excluded.fetched_at",
            params![url, body, fetched_at],
        )?;
        if rows != 1 {
            return Err(WhatError::CacheIntegrity { rows });
        }
        Ok(())
    }
}

/// Caching layer over an inner transport.
///
/// `GET`s are answered from the cache when a fresh entry exists; otherwise
/// the inner transport is asked and its body written back before being
/// returned. A failed write fails the request. Form posts are never cached.
pub struct CachedTransport<'a, T: ?Sized> {
    inner: &'a T,
    cache: Option<&'a ResponseCache>,
}

impl<'a, T: Transport + ?Sized> CachedTransport<'a, T> {
    pub fn new(inner: &'a T, cache: Option<&'a ResponseCache>) -> Self {
        Self { inner, cache }
    }
}

impl<T: Transport + ?Sized> Transport for CachedTransport<'_, T> {
    fn get(&self, url: &Url) -> Result<Vec<u8>> {
        let Some(cache) = self.cache else {
            return self.inner.get(url);
        };
        if let Some(body) = cache.get(url.as_str())? {
            debug!(%url, "cache hit");
            return Ok(body);
        }
        debug!(%url, "cache miss");
        let body = self.inner.get(url)?;
        cache.put(url.as_str(), &body)?;
        Ok(body)
    }

    fn post_form(&self, url: &Url, form: &[(&str, &str)]) -> Result<Url> {
        self.inner.post_form(url, form)
    }
}
