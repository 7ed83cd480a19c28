//! Network transport.
//!
//! The tracker is reached through two kinds of request:
//!
//! - `GET` of an API or logout URL, returning the body bytes of a
//!   `200 OK` response;
//! - form `POST` to `login.php`, returning the URL the server finally
//!   redirected to, which is how login success is recognised.
//!
//! [`Transport`] is that contract. [`HttpTransport`] implements it over a
//! blocking `reqwest` client, and
//! [`CachedTransport`](crate::cache::CachedTransport) layers the response
//! cache on top of any implementation.

use crate::cookies::SessionJar;
use crate::error::{Result, WhatError};
use reqwest::blocking::{Client, ClientBuilder};
use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use std::sync::Arc;
use tracing::debug;

/// Request contract shared by the HTTP client and the caching layer.
pub trait Transport {
    /// `GET url`. Any status other than `200 OK` is
    /// [`WhatError::Status`].
    fn get(&self, url: &Url) -> Result<Vec<u8>>;

    /// `POST` `form` as `application/x-www-form-urlencoded` and return the
    /// final URL after redirects.
    fn post_form(&self, url: &Url, form: &[(&str, &str)]) -> Result<Url>;
}

/// Blocking HTTP transport backed by [`reqwest::blocking::Client`].
///
/// Timeouts, proxies and TLS settings are whatever the builder passed to
/// [`with_builder`](Self::with_builder) configures; nothing is retried.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    /// Transport with `reqwest` defaults, sending `user_agent` and keeping
    /// cookies in `jar`.
    pub fn new(user_agent: &str, jar: Arc<SessionJar>) -> Result<Self> {
        Self::with_builder(Client::builder(), user_agent, jar)
    }

    /// Finish a caller-prepared builder (e.g. with a timeout), installing
    /// the user agent and cookie jar.
    pub fn with_builder(
        builder: ClientBuilder,
        user_agent: &str,
        jar: Arc<SessionJar>,
    ) -> Result<Self> {
        let http = builder.user_agent(user_agent).cookie_provider(jar).build()?;
        Ok(Self { http })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &Url) -> Result<Vec<u8>> {
        let resp = self.http.get(url.clone()).send()?;
        let status = resp.status();
        debug!(%status, path = url.path(), "GET");
        if status != StatusCode::OK {
            return Err(WhatError::Status {
                status: status.to_string(),
            });
        }
        Ok(resp.bytes()?.to_vec())
    }

    fn post_form(&self, url: &Url, form: &[(&str, &str)]) -> Result<Url> {
        let body = form
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let resp = self
            .http
            .post(url.clone())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()?;
        debug!(status = %resp.status(), landed = resp.url().path(), "POST");
        Ok(resp.url().clone())
    }
}
