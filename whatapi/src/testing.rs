//! In-process fake tracker for unit tests.

use crate::client::Client;
use crate::cookies::SessionJar;
use crate::error::{Result, WhatError};
use crate::store::Database;
use crate::transport::Transport;
use reqwest::Url;
use std::cell::RefCell;
use std::sync::Arc;
use std::time::Duration;

pub(crate) const BASE: &str = "https://tracker.test/";

pub(crate) const ACCOUNT: &str = r#"{
    "status": "success",
    "response": {
        "username": "alice",
        "id": 42,
        "authkey": "AUTHKEY",
        "passkey": "PASSKEY",
        "notifications": { "messages": 1, "notifications": 0 },
        "userstats": {
            "uploaded": 1000,
            "downloaded": 500,
            "ratio": 2.0,
            "requiredratio": 0.6,
            "class": "Member"
        }
    }
}"#;

enum Reply {
    Body(String),
    Status(String),
}

/// Canned tracker. GETs are answered by the first route whose pattern is a
/// substring of the URL; unmatched GETs are `404 Not Found`.
pub(crate) struct FakeTransport {
    routes: RefCell<Vec<(String, Reply)>>,
    landing: RefCell<String>,
    session: Option<(Arc<SessionJar>, String)>,
    rotated: RefCell<Option<String>>,
    gets: RefCell<Vec<String>>,
    posts: RefCell<Vec<String>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self {
            routes: RefCell::new(Vec::new()),
            landing: RefCell::new(format!("{BASE}index.php")),
            session: None,
            rotated: RefCell::new(None),
            gets: RefCell::new(Vec::new()),
            posts: RefCell::new(Vec::new()),
        }
    }

    /// Require `cookie` in `jar` for every GET, and set it on login.
    pub(crate) fn with_session_cookie(mut self, jar: Arc<SessionJar>, cookie: &str) -> Self {
        self.session = Some((jar, cookie.to_owned()));
        self
    }

    /// Hand out `cookie` on the next authorised GET, as a tracker renewing
    /// its session would.
    pub(crate) fn rotate_session(&self, cookie: &str) {
        *self.rotated.borrow_mut() = Some(cookie.to_owned());
    }

    pub(crate) fn route(&self, pattern: &str, body: &str) {
        self.routes
            .borrow_mut()
            .insert(0, (pattern.to_owned(), Reply::Body(body.to_owned())));
    }

    pub(crate) fn fail(&self, pattern: &str, status: &str) {
        self.routes
            .borrow_mut()
            .insert(0, (pattern.to_owned(), Reply::Status(status.to_owned())));
    }

    pub(crate) fn land_on(&self, url: &str) {
        *self.landing.borrow_mut() = url.to_owned();
    }

    pub(crate) fn get_count(&self) -> usize {
        self.gets.borrow().len()
    }

    pub(crate) fn gets_matching(&self, pattern: &str) -> usize {
        self.gets.borrow().iter().filter(|u| u.contains(pattern)).count()
    }

    pub(crate) fn last_get(&self) -> Option<String> {
        self.gets.borrow().last().cloned()
    }

    pub(crate) fn post_count(&self) -> usize {
        self.posts.borrow().len()
    }

    fn has_session(&self, url: &Url) -> bool {
        match &self.session {
            Some((jar, cookie)) => jar.cookies_for(url).contains(cookie),
            None => true,
        }
    }
}

impl Transport for FakeTransport {
    fn get(&self, url: &Url) -> Result<Vec<u8>> {
        self.gets.borrow_mut().push(url.to_string());
        if !self.has_session(url) {
            return Err(WhatError::Status {
                status: "401 Unauthorized".into(),
            });
        }
        if let (Some((jar, _)), Some(cookie)) = (&self.session, self.rotated.borrow_mut().take()) {
            jar.restore(url, &[cookie]);
        }
        let routes = self.routes.borrow();
        match routes.iter().find(|(pattern, _)| url.as_str().contains(pattern)) {
            Some((_, Reply::Body(body))) => Ok(body.clone().into_bytes()),
            Some((_, Reply::Status(status))) => Err(WhatError::Status {
                status: status.clone(),
            }),
            None => Err(WhatError::Status {
                status: "404 Not Found".into(),
            }),
        }
    }

    fn post_form(&self, url: &Url, _form: &[(&str, &str)]) -> Result<Url> {
        self.posts.borrow_mut().push(url.to_string());
        if let Some((jar, cookie)) = &self.session {
            jar.restore(url, std::slice::from_ref(cookie));
        }
        Url::parse(&self.landing.borrow()).map_err(|e| WhatError::InvalidUrl(e.to_string()))
    }
}

/// Client over a fake that answers the account probe, without storage.
pub(crate) fn client() -> Client<FakeTransport> {
    let fake = FakeTransport::new();
    fake.route("action=index", ACCOUNT);
    Client::with_transport(BASE, fake, Arc::default()).unwrap()
}

/// Same as [`client`], with an in-memory cache of the given TTL.
pub(crate) fn cached_client(ttl: Duration) -> Client<FakeTransport> {
    client().with_store(Database::open_in_memory().unwrap(), ttl)
}

/// Log `client` in and forget the probe request in the call counts.
pub(crate) fn logged_in(mut client: Client<FakeTransport>) -> Client<FakeTransport> {
    client.login("alice", "hunter2").unwrap();
    client.transport().gets.borrow_mut().clear();
    client.transport().posts.borrow_mut().clear();
    client
}
