//! Session cookies: the live jar and its persisted copy.
//!
//! [`SessionJar`] is installed as the `reqwest` cookie provider, so every
//! request made through [`HttpTransport`](crate::transport::HttpTransport)
//! reads and updates it. Unlike [`reqwest::cookie::Jar`] it can be emptied
//! in place, which login needs when a saved session turns out to be dead.
//!
//! [`CookieTable`] stores the jar's cookies for a base URL in the `cookies`
//! table as a JSON array of `name=value` strings:
//!
//! ```json
//! ["session=4f6c...", "PHPSESSID=abc123"]
//! ```

use crate::error::{Result, WhatError};
use crate::store::Database;
use reqwest::Url;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::HeaderValue;
use rusqlite::{OptionalExtension, params};
use std::sync::{PoisonError, RwLock, RwLockReadGuard};
use tracing::{debug, warn};

/// Resettable cookie jar shared between the client and its HTTP transport.
#[derive(Debug, Default)]
pub struct SessionJar {
    inner: RwLock<Jar>,
}

impl SessionJar {
    /// Cookies that would be sent to `url`, as `name=value` pairs.
    pub fn cookies_for(&self, url: &Url) -> Vec<String> {
        let Some(header) = self.read().cookies(url) else {
            return Vec::new();
        };
        header
            .to_str()
            .map(|h| h.split("; ").map(str::to_owned).collect())
            .unwrap_or_default()
    }

    /// Add previously saved `name=value` pairs for `url`.
    pub fn restore(&self, url: &Url, cookies: &[String]) {
        let jar = self.read();
        for cookie in cookies {
            jar.add_cookie_str(cookie, url);
        }
    }

    /// Drop every cookie.
    pub fn reset(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Jar::default();
    }

    fn read(&self) -> RwLockReadGuard<'_, Jar> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CookieStore for SessionJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        self.read().set_cookies(cookie_headers, url);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.read().cookies(url)
    }
}

/// Persisted cookie records, one per base URL.
#[derive(Debug, Clone)]
pub struct CookieTable {
    db: Database,
}

impl CookieTable {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Cookies saved for `base_url`.
    ///
    /// Returns an empty list when nothing was saved. A record that no longer
    /// parses is logged and also treated as empty: the caller falls back to
    /// a full login, whose save replaces the record.
    pub fn load(&self, base_url: &Url) -> Result<Vec<String>> {
        let raw: Option<String> = self
            .db
            .conn()
            .query_row(
                "SELECT cookie FROM cookies WHERE url = ?1",
                [base_url.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        let Some(raw) = raw else {
            debug!(url = %base_url, "no saved cookies");
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(cookies) => Ok(cookies),
            Err(err) => {
                warn!(url = %base_url, error = %err, "ignoring unreadable cookie record");
                Ok(Vec::new())
            }
        }
    }

    /// Replace the record for `base_url` with `cookies`.
    pub fn save(&self, base_url: &Url, cookies: &[String]) -> Result<()> {
        let raw = serde_json::to_string(cookies).map_err(WhatError::Cookie)?;
        self.db.conn().execute(
            "INSERT INTO cookies (url, cookie) VALUES (?1, ?2)
             ON CONFLICT(url) DO UPDATE SET cookie = excluded.cookie",
            params![base_url.as_str(), raw],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://tracker.test/").unwrap()
    }

    #[test]
    fn load_without_record_is_empty() {
        let table = CookieTable::new(Database::open_in_memory().unwrap());
        assert!(table.load(&base()).unwrap().is_empty());
    }

    #[test]
    fn save_overwrites_previous_record() {
        let db = Database::open_in_memory().unwrap();
        let table = CookieTable::new(db.clone());
        table.save(&base(), &["session=old".to_owned()]).unwrap();
        table.save(&base(), &["session=new".to_owned()]).unwrap();

        assert_eq!(table.load(&base()).unwrap(), vec!["session=new".to_owned()]);
        let rows: i64 = db
            .conn()
            .query_row("SELECT count(*) FROM cookies", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn records_are_keyed_by_base_url() {
        let table = CookieTable::new(Database::open_in_memory().unwrap());
        let other = Url::parse("https://other.test/").unwrap();
        table.save(&base(), &["session=a".to_owned()]).unwrap();
        assert!(table.load(&other).unwrap().is_empty());
    }

    #[test]
    fn unreadable_record_degrades_to_empty() {
        let db = Database::open_in_memory().unwrap();
        db.conn()
            .execute(
                "INSERT INTO cookies (url, cookie) VALUES (?1, 'not json')",
                [base().as_str()],
            )
            .unwrap();
        let table = CookieTable::new(db);
        assert!(table.load(&base()).unwrap().is_empty());
    }

    #[test]
    fn jar_restore_and_reset() {
        let jar = SessionJar::default();
        jar.restore(&base(), &["session=abc".to_owned(), "theme=dark".to_owned()]);

        let mut cookies = jar.cookies_for(&base());
        cookies.sort();
        assert_eq!(cookies, vec!["session=abc".to_owned(), "theme=dark".to_owned()]);

        jar.reset();
        assert!(jar.cookies_for(&base()).is_empty());
    }
}
