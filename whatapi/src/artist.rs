//! Artist API.
//!
//! Endpoint: `GET /ajax.php?action=artist&id=<id>` or
//! `GET /ajax.php?action=artist&artistname=<name>`
//!
//! Response:
//! ```json
//! {
//!   "status": "success",
//!   "response": {
//!     "id": 1460,
//!     "name": "Logistics",
//!     "tags": [{ "name": "drum.and.bass", "count": 11 }],
//!     "statistics": { "numGroups": 12, "numTorrents": 40, ... },
//!     "torrentgroup": [
//!       {
//!         "groupId": 72189,
//!         "groupName": "Fear Not",
//!         "extendedArtists": { "1": [{ "id": 1460, "name": "Logistics", "aliasid": 1460 }] },
//!         "torrent": [ ... ]
//!       }
//!     ]
//!   }
//! }
//! ```
//!
//! Some trackers send `"extendedArtists":false` for groups without credits;
//! the default quirk registry rewrites it to an empty object.

use crate::client::{Client, set_param};
use crate::error::Result;
use crate::transport::Transport;
use crate::types::Artist;

impl<T: Transport> Client<T> {
    /// Get an artist page.
    ///
    /// `id` is sent unless it is `0` and `params` already names the artist
    /// through `artistname`.
    pub fn artist(&self, id: u64, params: &[(&str, &str)]) -> Result<Artist> {
        let id = id.to_string();
        let mut query = params.to_vec();
        if id != "0" || !params.iter().any(|(k, _)| *k == "artistname") {
            set_param(&mut query, "id", &id);
        }
        self.action("artist", &query)
    }
}
