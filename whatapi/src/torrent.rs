//! Torrents, torrent groups, search, and capability URLs.
//!
//! Endpoints:
//!
//! - `GET /ajax.php?action=torrent&id=<id>` (or `&hash=<infohash>`)
//! - `GET /ajax.php?action=torrentgroup&id=<id>` (or `&hash=<infohash>`)
//! - `GET /ajax.php?action=browse&searchstr=<query>`
//!
//! Download and upload URLs are *capability URLs*: the session keys are
//! embedded in them, so fetching them needs no cookie and no further API
//! call.
//!
//! ```text
//! /torrents.php?action=download&authkey=<auth>&id=<id>&torrent_pass=<pass>
//! /upload.php                     (form field `auth=<auth>`)
//! ```

use crate::client::{Client, set_param};
use crate::error::{Result, WhatError};
use crate::transport::Transport;
use crate::types::{TorrentDetail, TorrentGroup, TorrentSearch};
use reqwest::Url;

impl<T: Transport> Client<T> {
    /// Get one torrent and the release it belongs to.
    ///
    /// `id` is sent unless it is `0` and `params` carries a `hash`.
    pub fn torrent(&self, id: u64, params: &[(&str, &str)]) -> Result<TorrentDetail> {
        let id = id.to_string();
        self.action("torrent", &by_id_or_hash(&id, params))
    }

    /// Get a release with all its torrents. Same `id`/`hash` rule as
    /// [`torrent`](Self::torrent).
    pub fn torrent_group(&self, id: u64, params: &[(&str, &str)]) -> Result<TorrentGroup> {
        let id = id.to_string();
        self.action("torrentgroup", &by_id_or_hash(&id, params))
    }

    /// Search torrents. Extra filters (`page`, `format`, `media`, ...) go in
    /// `params`.
    pub fn search_torrents(&self, search: &str, params: &[(&str, &str)]) -> Result<TorrentSearch> {
        let mut query = params.to_vec();
        set_param(&mut query, "searchstr", search);
        self.action("browse", &query)
    }

    /// Direct download URL for torrent `id`.
    pub fn download_url(&self, id: u64) -> Result<Url> {
        let (auth_key, pass_key) = self.keys()?;
        let id = id.to_string();
        self.build_url(
            "torrents.php",
            Some("download"),
            &[("id", id.as_str()), ("authkey", auth_key), ("torrent_pass", pass_key)],
        )
    }

    /// Upload form URL and the auth key to submit with it.
    pub fn upload_url(&self) -> Result<(Url, String)> {
        let (auth_key, _) = self.keys()?;
        let url = self
            .base_url
            .join("upload.php")
            .map_err(|e| WhatError::InvalidUrl(e.to_string()))?;
        Ok((url, auth_key.to_owned()))
    }

    fn keys(&self) -> Result<(&str, &str)> {
        if !self.is_logged_in() {
            return Err(WhatError::AuthenticationRequired);
        }
        match (self.session.auth_key(), self.session.pass_key()) {
            (Some(auth), Some(pass)) => Ok((auth, pass)),
            _ => Err(WhatError::AuthenticationRequired),
        }
    }
}

fn by_id_or_hash<'a>(id: &'a str, params: &[(&'a str, &'a str)]) -> Vec<(&'a str, &'a str)> {
    let mut query = params.to_vec();
    if id != "0" || !params.iter().any(|(k, _)| *k == "hash") {
        set_param(&mut query, "id", id);
    }
    query
}
