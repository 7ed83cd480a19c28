//! SQLite backing store shared by the response cache and cookie persistence.
//!
//! Both tables are keyed by URL and use last-write-wins semantics:
//!
//! ```sql
//! urlcache (requesturl TEXT PRIMARY KEY, body BLOB, fetched_at TEXT)
//! cookies  (url        TEXT PRIMARY KEY, cookie TEXT)
//! ```

use crate::error::Result;
use rusqlite::Connection;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS urlcache (
    requesturl TEXT PRIMARY KEY NOT NULL,
    body       BLOB NOT NULL,
    fetched_at TEXT NOT NULL
) WITHOUT ROWID;

CREATE TABLE IF NOT EXISTS cookies (
    url    TEXT PRIMARY KEY NOT NULL,
    cookie TEXT NOT NULL
) WITHOUT ROWID;
";

/// Cloneable handle to the backing SQLite database.
///
/// The mutex only serializes use of the single connection; it does not make
/// a client session safe to drive from several threads.
#[derive(Debug, Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database at `path`, creating parent directories
    /// and the schema if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Self::init(Connection::open(path)?)
    }

    /// Open a private in-memory database. Contents vanish when the last
    /// handle is dropped.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
