//! Tracker client and request dispatcher.
//!
//! Every read goes through [`Client::get_json`]:
//!
//! 1. Refuse with [`WhatError::AuthenticationRequired`] unless logged in.
//! 2. Serve the body from the response cache if a fresh entry exists,
//!    otherwise `GET` it and write it to the cache.
//! 3. Decode the [`Envelope`]; a non-`success` status becomes
//!    [`WhatError::Api`] with the server's message.
//! 4. Decode the caller's target type, retrying once with the registered
//!    [`Quirk`](crate::quirks::Quirk) correction if the first attempt fails.
//!
//! Endpoint methods live in separate modules (`artist`, `torrent`, `top10`)
//! as `impl Client` blocks and only assemble query parameters.

use crate::auth::Session;
use crate::cache::{CachedTransport, ResponseCache};
use crate::config::Config;
use crate::cookies::{CookieTable, SessionJar};
use crate::error::{Result, WhatError};
use crate::quirks::QuirkRegistry;
use crate::store::Database;
use crate::transport::{HttpTransport, Transport};
use crate::types::{ApiResponse, Envelope};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Path of the JSON API on the tracker.
pub(crate) const API_PATH: &str = "ajax.php";

/// Blocking client for one tracker session.
///
/// Holds the transport, the cookie jar it shares with the transport, the
/// optional cache and cookie table, and the [`Session`]. One caller drives a
/// client at a time; login and logout take `&mut self`.
pub struct Client<T = HttpTransport> {
    pub(crate) base_url: Url,
    pub(crate) transport: T,
    pub(crate) jar: Arc<SessionJar>,
    pub(crate) cache: Option<ResponseCache>,
    pub(crate) cookies: Option<CookieTable>,
    pub(crate) quirks: QuirkRegistry,
    pub(crate) session: Session,
}

impl Client<HttpTransport> {
    /// Client for `base_url` with an HTTP transport sending `user_agent`
    /// and no persistent storage.
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self> {
        let jar = Arc::new(SessionJar::default());
        let transport = HttpTransport::new(user_agent, Arc::clone(&jar))?;
        Client::with_transport(base_url, transport, jar)
    }

    /// Client described by `config`, opening its database if one is set.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Self::new(&config.base_url, &config.user_agent)?;
        match &config.database {
            Some(path) => Ok(client.with_store(Database::open(path)?, config.cache_ttl)),
            None => Ok(client),
        }
    }
}

impl<T: Transport> Client<T> {
    /// Client over an arbitrary transport. `jar` must be the jar that
    /// transport sends cookies from, so that login can save and reset it.
    pub fn with_transport(base_url: &str, transport: T, jar: Arc<SessionJar>) -> Result<Self> {
        let mut base_url = Url::parse(base_url).map_err(|e| WhatError::InvalidUrl(e.to_string()))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            transport,
            jar,
            cache: None,
            cookies: None,
            quirks: QuirkRegistry::default(),
            session: Session::default(),
        })
    }

    /// Attach `db` as response cache (entries live for `ttl`) and as cookie
    /// storage for session resumption.
    #[must_use]
    pub fn with_store(mut self, db: Database, ttl: Duration) -> Self {
        self.cache = Some(ResponseCache::new(db.clone(), ttl));
        self.cookies = Some(CookieTable::new(db));
        self
    }

    /// Replace the quirk corrections applied when decoding.
    #[must_use]
    pub fn with_quirks(mut self, quirks: QuirkRegistry) -> Self {
        self.quirks = quirks;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn jar(&self) -> &Arc<SessionJar> {
        &self.jar
    }

    /// Fetch `request_url` (cached when possible) and decode it into `R`.
    ///
    /// # Errors
    ///
    /// - [`WhatError::AuthenticationRequired`] before login, without any
    ///   network request
    /// - [`WhatError::Status`] / [`WhatError::Http`] on network failure
    /// - [`WhatError::Cache`] if the cache cannot be read or written
    /// - [`WhatError::Api`] if the envelope reports failure
    /// - [`WhatError::Decode`] if the body does not fit `R`
    pub fn get_json<R: DeserializeOwned + 'static>(&self, request_url: &Url) -> Result<R> {
        if !self.session.is_logged_in() {
            return Err(WhatError::AuthenticationRequired);
        }
        let body = CachedTransport::new(&self.transport, self.cache.as_ref()).get(request_url)?;
        decode(&body, &self.quirks)
    }

    /// Call `ajax.php?action=<action>` with `params` and return the
    /// `response` payload.
    pub fn action<R: DeserializeOwned + 'static>(
        &self,
        action: &str,
        params: &[(&str, &str)],
    ) -> Result<R> {
        let url = self.build_url(API_PATH, Some(action), params)?;
        let resp: ApiResponse<R> = self.get_json(&url)?;
        Ok(resp.response)
    }

    /// `<base>/<path>?action=<action>&<params>`, query keys sorted so that
    /// equal requests map to equal cache keys.
    pub(crate) fn build_url(
        &self,
        path: &str,
        action: Option<&str>,
        params: &[(&str, &str)],
    ) -> Result<Url> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| WhatError::InvalidUrl(e.to_string()))?;

        let mut pairs: Vec<(&str, &str)> = action.map(|a| ("action", a)).into_iter().collect();
        pairs.extend(params.iter().filter(|(k, _)| *k != "action").copied());
        pairs.sort_by_key(|&(k, _)| k);

        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }
}

/// Decode `body` into `R`: envelope check first, then the target with at
/// most one quirk-corrected retry.
pub(crate) fn decode<R: DeserializeOwned + 'static>(
    body: &[u8],
    quirks: &QuirkRegistry,
) -> Result<R> {
    let envelope: Envelope = serde_json::from_slice(body)?;
    envelope.check()?;

    match serde_json::from_slice(body) {
        Ok(value) => Ok(value),
        Err(err) => {
            let Some(quirk) = quirks.get::<R>() else {
                return Err(err.into());
            };
            debug!(error = %err, fragment = quirk.from, "retrying decode with quirk correction");
            Ok(serde_json::from_slice(&quirk.apply(body))?)
        }
    }
}

/// Set `key` to `value`, replacing whatever the caller passed for it.
pub(crate) fn set_param<'a>(params: &mut Vec<(&'a str, &'a str)>, key: &'a str, value: &'a str) {
    params.retain(|(k, _)| *k != key);
    params.push((key, value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, FakeTransport};
    use crate::types::Account;
    use chrono::{TimeDelta, Utc};

    const ARTIST_FAILURE: &str = r#"{"status":"failure","error":"bad id parameter"}"#;

    #[test]
    fn base_url_gets_trailing_slash() {
        let client =
            Client::with_transport("https://tracker.test/sub", FakeTransport::new(), Arc::default())
                .unwrap();
        assert_eq!(client.base_url().as_str(), "https://tracker.test/sub/");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = Client::with_transport("not a url", FakeTransport::new(), Arc::default())
            .err()
            .unwrap();
        assert!(matches!(err, WhatError::InvalidUrl(_)));
    }

    #[test]
    fn build_url_sorts_query_and_sets_action() {
        let client = testing::client();
        let url = client
            .build_url(API_PATH, Some("browse"), &[("searchstr", "a b"), ("page", "2")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://tracker.test/ajax.php?action=browse&page=2&searchstr=a+b"
        );
    }

    #[test]
    fn dispatch_before_login_makes_no_request() {
        let client = testing::client();
        let url = client.build_url(API_PATH, Some("index"), &[]).unwrap();

        let err = client.get_json::<ApiResponse<Account>>(&url).unwrap_err();
        assert!(matches!(err, WhatError::AuthenticationRequired));
        assert_eq!(client.transport().get_count(), 0);
    }

    #[test]
    fn repeat_dispatch_within_ttl_hits_network_once() {
        let client = testing::logged_in(testing::cached_client(Duration::from_secs(3600)));
        let url = client.build_url(API_PATH, Some("index"), &[]).unwrap();

        let first: ApiResponse<Account> = client.get_json(&url).unwrap();
        let second: ApiResponse<Account> = client.get_json(&url).unwrap();

        assert_eq!(first.response.username, second.response.username);
        assert_eq!(first.response.authkey, second.response.authkey);
        assert_eq!(client.transport().get_count(), 1);
    }

    #[test]
    fn stale_entry_is_refetched() {
        let client = testing::logged_in(testing::cached_client(Duration::from_secs(60)));
        let url = client.build_url(API_PATH, Some("index"), &[]).unwrap();
        client
            .cache
            .as_ref()
            .unwrap()
            .put_at(url.as_str(), testing::ACCOUNT.as_bytes(), Utc::now() - TimeDelta::minutes(5))
            .unwrap();

        let _: ApiResponse<Account> = client.get_json(&url).unwrap();
        assert_eq!(client.transport().get_count(), 1);
    }

    #[test]
    fn without_cache_every_dispatch_fetches() {
        let client = testing::logged_in(testing::client());
        let url = client.build_url(API_PATH, Some("index"), &[]).unwrap();

        let _: ApiResponse<Account> = client.get_json(&url).unwrap();
        let _: ApiResponse<Account> = client.get_json(&url).unwrap();
        assert_eq!(client.transport().get_count(), 2);
    }

    #[test]
    fn failure_envelope_is_api_error() {
        let client = testing::logged_in(testing::client());
        client.transport().route("action=artist", ARTIST_FAILURE);

        let err = client
            .action::<crate::types::Artist>("artist", &[("id", "0")])
            .unwrap_err();
        match err {
            WhatError::Api { message } => assert_eq!(message, "bad id parameter"),
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[test]
    fn non_200_is_status_error() {
        let client = testing::logged_in(testing::client());
        client.transport().fail("action=artist", "502 Bad Gateway");

        let err = client
            .action::<crate::types::Artist>("artist", &[("id", "1")])
            .unwrap_err();
        match err {
            WhatError::Status { status } => assert_eq!(status, "502 Bad Gateway"),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn mismatched_shape_is_decode_error() {
        let client = testing::logged_in(testing::client());
        client
            .transport()
            .route("action=artist", r#"{"status":"success","response":{"id":"x"}}"#);

        let err = client
            .action::<crate::types::Artist>("artist", &[("id", "1")])
            .unwrap_err();
        assert!(matches!(err, WhatError::Decode(_)));
    }

    #[test]
    fn non_json_body_is_decode_error() {
        let client = testing::logged_in(testing::client());
        client.transport().route("action=artist", "<html>login</html>");

        let err = client
            .action::<crate::types::Artist>("artist", &[("id", "1")])
            .unwrap_err();
        assert!(matches!(err, WhatError::Decode(_)));
    }

    #[test]
    fn quirk_is_not_applied_to_other_targets() {
        let body = br#"{"status":"success","response":{"extendedArtists":false}}"#;
        let quirks = QuirkRegistry::default();
        let result = decode::<ApiResponse<std::collections::HashMap<String, serde_json::Value>>>(
            body, &quirks,
        )
        .unwrap();
        assert_eq!(result.response["extendedArtists"], serde_json::Value::Bool(false));

        #[derive(serde::Deserialize)]
        #[allow(dead_code)]
        struct Strict {
            #[serde(rename = "extendedArtists")]
            extended: std::collections::HashMap<String, String>,
        }
        assert!(matches!(
            decode::<ApiResponse<Strict>>(body, &quirks),
            Err(WhatError::Decode(_))
        ));
    }

    #[test]
    fn set_param_replaces_existing_key() {
        let mut params = vec![("id", "1"), ("page", "2")];
        set_param(&mut params, "id", "7");
        assert_eq!(params, vec![("page", "2"), ("id", "7")]);
    }
}
