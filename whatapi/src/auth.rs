//! Session management: login, logout and the account probe.
//!
//! A client starts [`SessionState::Anonymous`]. Login moves it through
//! `Authenticating` to `Authenticated`:
//!
//! 1. With cookie storage configured, the saved cookies for the base URL are
//!    loaded into the jar and `ajax.php?action=index` is probed. If the
//!    tracker accepts them the session is resumed and no credentials are
//!    sent. Otherwise the jar is emptied (and the empty jar saved).
//! 2. `username`/`password` are posted to `login.php`. The tracker
//!    redirects to `index.php` on success; landing anywhere else is
//!    [`WhatError::LoginFailed`].
//! 3. The account probe harvests `authkey` and `passkey`, then the jar is
//!    saved for the next run.
//!
//! The probe bypasses both the login gate and the response cache.

use crate::client::{API_PATH, Client, decode};
use crate::error::{Result, WhatError};
use crate::transport::Transport;
use crate::types::{Account, ApiResponse};
use std::fmt;
use tracing::{debug, info, warn};

/// Substring of the post-login URL that marks a successful login.
const LOGIN_SUCCESS_MARKER: &str = "index";

/// Where a client is in the login cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticating,
    Authenticated,
}

/// Authentication state of a client.
#[derive(Default)]
pub struct Session {
    state: SessionState,
    auth_key: Option<String>,
    pass_key: Option<String>,
}

impl Session {
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_logged_in(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    /// Key required by logout, upload and download URLs.
    pub fn auth_key(&self) -> Option<&str> {
        self.auth_key.as_deref()
    }

    /// Key embedded in download URLs.
    pub fn pass_key(&self) -> Option<&str> {
        self.pass_key.as_deref()
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("auth_key", &self.auth_key.as_ref().map(|_| "<redacted>"))
            .field("pass_key", &self.pass_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl<T: Transport> Client<T> {
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }

    /// Log in, resuming a saved session when possible.
    ///
    /// On any error the client is left anonymous.
    ///
    /// # Errors
    ///
    /// - [`WhatError::LoginFailed`]: credentials rejected
    /// - [`WhatError::Http`] / [`WhatError::Status`]: network failure
    /// - [`WhatError::Cache`]: cookie storage failure
    /// - any error of [`account`](Self::account) after a successful post
    pub fn login(&mut self, username: &str, password: &str) -> Result<()> {
        self.session.state = SessionState::Authenticating;
        match self.authenticate(username, password) {
            Ok(()) => {
                self.session.state = SessionState::Authenticated;
                info!(url = %self.base_url, "logged in");
                Ok(())
            }
            Err(err) => {
                self.session.clear();
                Err(err)
            }
        }
    }

    fn authenticate(&mut self, username: &str, password: &str) -> Result<()> {
        if self.resume()? {
            return Ok(());
        }

        let url = self.build_url("login.php", None, &[])?;
        let landed = self
            .transport
            .post_form(&url, &[("username", username), ("password", password)])?;
        if !landed.as_str().contains(LOGIN_SUCCESS_MARKER) {
            debug!(landed = landed.path(), "login did not reach the index page");
            return Err(WhatError::LoginFailed);
        }

        self.account()?;
        self.save_cookies()
    }

    /// Try the saved cookies. `Ok(false)` means a fresh login is needed.
    fn resume(&mut self) -> Result<bool> {
        let Some(table) = &self.cookies else {
            return Ok(false);
        };
        let saved = table.load(&self.base_url)?;
        self.jar.restore(&self.base_url, &saved);

        match self.account() {
            Ok(account) => {
                info!(user = %account.username, "resumed saved session");
                self.save_cookies()?;
                Ok(true)
            }
            Err(err) => {
                debug!(error = %err, "saved session rejected, logging in");
                self.jar.reset();
                self.save_cookies()?;
                Ok(false)
            }
        }
    }

    fn save_cookies(&self) -> Result<()> {
        match &self.cookies {
            Some(table) => table.save(&self.base_url, &self.jar.cookies_for(&self.base_url)),
            None => Ok(()),
        }
    }

    /// Fetch the current account and refresh the session keys from it.
    ///
    /// Always goes to the network and does not require a completed login;
    /// it is how login validates a session.
    pub fn account(&mut self) -> Result<Account> {
        let url = self.build_url(API_PATH, Some("index"), &[])?;
        let body = self.transport.get(&url)?;
        let resp: ApiResponse<Account> = decode(&body, &self.quirks)?;
        self.session.auth_key = Some(resp.response.authkey.clone());
        self.session.pass_key = Some(resp.response.passkey.clone());
        Ok(resp.response)
    }

    /// End the session.
    ///
    /// Local state is cleared first and unconditionally. The server-side
    /// `logout.php` call is best effort: its error is returned, but the
    /// client is anonymous either way.
    pub fn logout(&mut self) -> Result<()> {
        let auth_key = self.session.auth_key.take().unwrap_or_default();
        self.session.clear();
        info!(url = %self.base_url, "logged out");

        let url = self.build_url("logout.php", None, &[("auth", auth_key.as_str())])?;
        if let Err(err) = self.transport.get(&url) {
            warn!(error = %err, "server-side logout failed");
            return Err(err);
        }
        Ok(())
    }
}
