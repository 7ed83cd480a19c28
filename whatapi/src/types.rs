//! Data types for tracker API responses.
//!
//! Every `ajax.php` response is wrapped in the same envelope:
//!
//! ```json
//! { "status": "success", "response": { ... } }
//! { "status": "failure", "error": "bad id parameter" }
//! ```
//!
//! [`Envelope`] is the minimal shape checked before anything else;
//! [`ApiResponse`] is the full wrapper endpoint methods decode into. Field
//! names follow Rust conventions and are mapped from the API's camelCase.

use crate::error::{Result, WhatError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Status string of a successful response.
pub const STATUS_SUCCESS: &str = "success";

/// The minimal `status`/`error` wrapper every response carries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Envelope {
    pub status: String,
    #[serde(default)]
    pub error: String,
}

impl Envelope {
    /// [`WhatError::Api`] with the server's message unless `status` is
    /// `success`.
    pub fn check(self) -> Result<()> {
        if self.status == STATUS_SUCCESS {
            Ok(())
        } else {
            Err(WhatError::Api {
                message: self.error,
            })
        }
    }
}

/// Envelope plus the endpoint-specific `response` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    #[serde(default)]
    pub error: String,
    pub response: T,
}

/// Current user, from `action=index`.
///
/// `authkey` and `passkey` are the session secrets used by logout and
/// capability URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    pub id: u64,
    pub authkey: String,
    pub passkey: String,
    #[serde(default)]
    pub notifications: Notifications,
    #[serde(default, rename = "userstats")]
    pub user_stats: UserStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Notifications {
    pub messages: u64,
    pub notifications: u64,
    pub new_announcement: bool,
    pub new_blog: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserStats {
    pub uploaded: u64,
    pub downloaded: u64,
    pub ratio: f64,
    #[serde(rename = "requiredratio")]
    pub required_ratio: f64,
    pub class: String,
}

/// Artist page, from `action=artist`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub notifications_enabled: bool,
    #[serde(default)]
    pub has_bookmarked: bool,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub vanity_house: bool,
    #[serde(default)]
    pub tags: Vec<TagCount>,
    #[serde(default)]
    pub similar_artists: Vec<SimilarArtist>,
    #[serde(default)]
    pub statistics: ArtistStatistics,
    #[serde(default, rename = "torrentgroup")]
    pub torrent_groups: Vec<ArtistGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagCount {
    pub name: String,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarArtist {
    pub artist_id: u64,
    pub name: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub similar_id: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArtistStatistics {
    pub num_groups: u64,
    pub num_torrents: u64,
    pub num_seeders: u64,
    pub num_leechers: u64,
    pub num_snatches: u64,
}

/// A release on an artist page.
///
/// `extended_artists` maps an importance code (`"1"` main, `"4"` composer,
/// ...) to the credited artists. The tracker sometimes sends `false`
/// instead of an object, see [`Quirk::EXTENDED_ARTISTS`](crate::quirks::Quirk::EXTENDED_ARTISTS).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistGroup {
    pub group_id: u64,
    pub group_name: String,
    #[serde(default)]
    pub group_year: u32,
    #[serde(default)]
    pub group_record_label: String,
    #[serde(default)]
    pub group_catalogue_number: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub release_type: u32,
    #[serde(default)]
    pub has_bookmarked: bool,
    #[serde(default)]
    pub wiki_image: String,
    #[serde(default, rename = "torrent")]
    pub torrents: Vec<Torrent>,
    #[serde(default)]
    pub extended_artists: HashMap<String, Option<Vec<ArtistCredit>>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistCredit {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub aliasid: u64,
}

/// One torrent of a release.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Torrent {
    pub id: u64,
    pub media: String,
    pub format: String,
    pub encoding: String,
    pub remastered: bool,
    pub remaster_year: u32,
    pub remaster_title: String,
    pub remaster_record_label: String,
    pub remaster_catalogue_number: String,
    pub scene: bool,
    pub has_log: bool,
    pub has_cue: bool,
    pub log_score: i64,
    pub file_count: u64,
    pub size: u64,
    pub seeders: u64,
    pub leechers: u64,
    pub snatched: u64,
    pub free_torrent: bool,
    pub time: String,
    pub file_path: String,
}

/// Release detail, from `action=torrentgroup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TorrentGroup {
    pub group: GroupInfo,
    #[serde(default)]
    pub torrents: Vec<Torrent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfo {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub year: u32,
    #[serde(default)]
    pub record_label: String,
    #[serde(default)]
    pub catalogue_number: String,
    #[serde(default)]
    pub release_type: u32,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub wiki_body: String,
    #[serde(default)]
    pub wiki_image: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A page of `action=browse` results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TorrentSearch {
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub results: Vec<SearchGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchGroup {
    pub group_id: u64,
    pub group_name: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub group_year: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub total_seeders: u64,
    #[serde(default)]
    pub total_snatched: u64,
    #[serde(default)]
    pub torrents: Vec<SearchTorrent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchTorrent {
    pub torrent_id: u64,
    pub media: String,
    pub format: String,
    pub encoding: String,
    pub remaster_year: u32,
    pub remaster_title: String,
    pub scene: bool,
    pub has_log: bool,
    pub size: u64,
    pub seeders: u64,
    pub snatches: u64,
}

/// A single torrent with its release, from `action=torrent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TorrentDetail {
    pub group: GroupInfo,
    pub torrent: Torrent,
}

/// `action=top10&type=torrents`: one list per period.
pub type TopTenTorrents = Vec<TopTenList<TopTenTorrent>>;
/// `action=top10&type=tags`: one list per ranking (most used, most voted).
pub type TopTenTags = Vec<TopTenList<TopTenTag>>;
/// `action=top10&type=users`: one list per ranking (uploaders, snatchers, ...).
pub type TopTenUsers = Vec<TopTenList<TopTenUser>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopTenList<E> {
    pub caption: String,
    pub tag: String,
    #[serde(default)]
    pub limit: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<E>,
}

/// A ranked torrent. `artist` is occasionally `false` upstream, see
/// [`Quirk::TOP_TEN_ARTIST`](crate::quirks::Quirk::TOP_TEN_ARTIST).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopTenTorrent {
    pub torrent_id: u64,
    pub group_id: u64,
    pub artist: String,
    pub group_name: String,
    #[serde(default)]
    pub group_year: u32,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub encoding: String,
    #[serde(default)]
    pub media: String,
    #[serde(default)]
    pub snatched: u64,
    #[serde(default)]
    pub seeders: u64,
    #[serde(default)]
    pub leechers: u64,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TopTenTag {
    pub name: String,
    pub uses: u64,
    pub pos_votes: u64,
    pub neg_votes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopTenUser {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub uploaded: u64,
    #[serde(default)]
    pub upspeed: f64,
    #[serde(default)]
    pub downloaded: u64,
    #[serde(default)]
    pub downspeed: f64,
    #[serde(default)]
    pub num_uploads: u64,
    #[serde(default)]
    pub join_date: String,
}
