//! Top 10 API.
//!
//! Endpoint: `GET /ajax.php?action=top10&type=torrents|tags|users[&limit=10|100|250]`
//!
//! Response: one list per ranking. For torrents that is one per period
//! (`day`, `week`, `overall`, ...):
//! ```json
//! {
//!   "status": "success",
//!   "response": [
//!     {
//!       "caption": "Most Active Torrents Uploaded in the Past Day",
//!       "tag": "day",
//!       "limit": 10,
//!       "results": [
//!         { "torrentId": 1, "groupId": 2, "artist": "Logistics", "groupName": "Fear Not", ... }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Releases without a main artist come back with `"artist":false`; the
//! default quirk registry rewrites it to an empty string.

use crate::client::{Client, set_param};
use crate::error::Result;
use crate::transport::Transport;
use crate::types::{TopTenTags, TopTenTorrents, TopTenUsers};

impl<T: Transport> Client<T> {
    /// Most active torrents per period.
    pub fn top_ten_torrents(&self, params: &[(&str, &str)]) -> Result<TopTenTorrents> {
        let mut query = params.to_vec();
        set_param(&mut query, "type", "torrents");
        self.action("top10", &query)
    }

    /// Most used and most voted tags.
    pub fn top_ten_tags(&self, params: &[(&str, &str)]) -> Result<TopTenTags> {
        let mut query = params.to_vec();
        set_param(&mut query, "type", "tags");
        self.action("top10", &query)
    }

    /// Top users by upload, download and activity.
    pub fn top_ten_users(&self, params: &[(&str, &str)]) -> Result<TopTenUsers> {
        let mut query = params.to_vec();
        set_param(&mut query, "type", "users");
        self.action("top10", &query)
    }
}

#[cfg(test)]
mod tests {
    use crate::testing;

    const TOP_TEN: &str = r#"{"status":"success","response":[
        {"caption":"Most Active Torrents Uploaded in the Past Day","tag":"day","limit":10,
         "results":[
            {"torrentId":1,"groupId":2,"artist":false,"groupName":"Various: Summer Mix",
             "groupYear":2019,"format":"MP3","encoding":"V0 (VBR)","media":"WEB","snatched":5},
            {"torrentId":3,"groupId":4,"artist":"Logistics","groupName":"Fear Not",
             "groupYear":2007,"format":"FLAC","encoding":"Lossless","media":"CD","snatched":9}
         ]}]}"#;

    #[test]
    fn artist_false_is_corrected() {
        let client = testing::logged_in(testing::client());
        client.transport().route("action=top10", TOP_TEN);

        let lists = client.top_ten_torrents(&[("limit", "10")]).unwrap();
        assert_eq!(lists[0].tag, "day");
        assert_eq!(lists[0].results[0].artist, "");
        assert_eq!(lists[0].results[1].artist, "Logistics");
        assert!(
            client
                .transport()
                .last_get()
                .unwrap()
                .ends_with("?action=top10&limit=10&type=torrents")
        );
    }

    #[test]
    fn top_ten_is_served_from_cache() {
        let client = testing::logged_in(testing::cached_client(std::time::Duration::from_secs(60)));
        client.transport().route("action=top10", TOP_TEN);

        let first = client.top_ten_torrents(&[]).unwrap();
        let second = client.top_ten_torrents(&[]).unwrap();
        assert_eq!(first[0].results.len(), second[0].results.len());
        assert_eq!(client.transport().gets_matching("action=top10"), 1);
    }

    #[test]
    fn top_ten_tags_decodes() {
        let client = testing::logged_in(testing::client());
        client.transport().route(
            "type=tags",
            r#"{"status":"success","response":[
                {"caption":"Most Used Torrent Tags","tag":"ut","limit":10,
                 "results":[{"name":"electronic","uses":1200,"posVotes":0,"negVotes":0}]}]}"#,
        );

        let lists = client.top_ten_tags(&[("type", "torrents")]).unwrap();
        assert_eq!(lists[0].results[0].name, "electronic");
        assert_eq!(lists[0].results[0].uses, 1200);
        assert!(
            client
                .transport()
                .last_get()
                .unwrap()
                .ends_with("?action=top10&type=tags")
        );
    }

    #[test]
    fn top_ten_users_decodes() {
        let client = testing::logged_in(testing::client());
        client.transport().route(
            "type=users",
            r#"{"status":"success","response":[
                {"caption":"Uploaders","tag":"ul","limit":10,
                 "results":[{"id":42,"username":"alice","uploaded":1000,"upspeed":12.5,
                             "downloaded":500,"downspeed":3.0,"numUploads":7,
                             "joinDate":"2010-01-01 00:00:00"}]}]}"#,
        );

        let lists = client.top_ten_users(&[]).unwrap();
        let user = &lists[0].results[0];
        assert_eq!(user.username, "alice");
        assert_eq!(user.num_uploads, 7);
    }
}
