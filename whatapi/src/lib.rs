//! Client library for Gazelle-based private tracker JSON APIs.
//!
//! Provides authenticated, blocking access to `ajax.php` with a persistent
//! response cache and session resumption from saved cookies.
//!
//! # Authentication
//!
//! Every API call requires a logged-in [`Client`]. With a database
//! configured, [`Client::login`] first tries the cookies saved by the
//! previous run and only posts credentials if the tracker rejects them.
//!
//! ```no_run
//! use whatapi::{Client, Config};
//!
//! let config = Config::new("https://orpheus.network/")
//!     .with_database(Config::default_database_path().unwrap());
//! let mut client = Client::from_config(&config).unwrap();
//! client.login("username", "password").unwrap();
//!
//! let artist = client.artist(1460, &[]).unwrap();
//! println!("{} ({} releases)", artist.name, artist.torrent_groups.len());
//! ```
//!
//! # API endpoint mapping
//!
//! | Method                             | Request                               | Description          |
//! |------------------------------------|---------------------------------------|----------------------|
//! | [`Client::account`]                | `ajax.php?action=index`               | Current user, keys   |
//! | [`Client::artist`]                 | `ajax.php?action=artist`              | Artist page          |
//! | [`Client::torrent`]                | `ajax.php?action=torrent`             | Torrent + release    |
//! | [`Client::torrent_group`]          | `ajax.php?action=torrentgroup`        | Release + torrents   |
//! | [`Client::search_torrents`]        | `ajax.php?action=browse`              | Torrent search       |
//! | [`Client::top_ten_torrents`]       | `ajax.php?action=top10&type=torrents` | Most active torrents |
//! | [`Client::top_ten_tags`]           | `ajax.php?action=top10&type=tags`     | Top tags             |
//! | [`Client::top_ten_users`]          | `ajax.php?action=top10&type=users`    | Top users            |
//! | [`Client::action`]                 | `ajax.php?action=<any>`               | Generic call         |
//! | [`Client::download_url`]           | `torrents.php?action=download`        | Capability URL       |
//! | [`Client::upload_url`]             | `upload.php`                          | Capability URL       |
//!
//! # Caching
//!
//! Responses are cached per request URL for [`Config::cache_ttl`]. The
//! account probe used by login is never cached. Without a database every
//! call reaches the network.

mod artist;
pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod cookies;
pub mod error;
pub mod quirks;
pub mod store;
mod top10;
mod torrent;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use auth::{Session, SessionState};
pub use client::Client;
pub use config::Config;
pub use error::{Result, WhatError};
pub use store::Database;
