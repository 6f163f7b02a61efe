//! Persisted cookie restoration.
//!
//! Sessions can reuse cookies captured in an earlier interactive run
//! (e.g. after solving a Cloudflare challenge by hand). The file is a
//! Playwright-style storage state: `{"cookies": [...], "origins": [...]}`.
//! Content is loaded verbatim and never validated or refreshed here.

use crate::error::{BrowserError, Result};
use chromiumoxide::cdp::browser_protocol::network::{CookieParam, CookieSameSite, TimeSinceEpoch};
use serde::Deserialize;
use std::path::Path;

/// Storage-state file as written by the cookie capture tooling.
#[derive(Debug, Deserialize)]
struct StorageState {
    #[serde(default)]
    cookies: Vec<PersistedCookie>,
}

/// One cookie entry from the storage-state file.
#[derive(Debug, Deserialize)]
struct PersistedCookie {
    name: String,
    value: String,
    domain: String,
    #[serde(default)]
    path: Option<String>,
    /// Seconds since epoch; -1 marks a session cookie
    #[serde(default)]
    expires: Option<f64>,
    #[serde(default)]
    secure: Option<bool>,
    #[serde(default, alias = "httpOnly")]
    http_only: Option<bool>,
    #[serde(default, alias = "sameSite")]
    same_site: Option<String>,
}

impl PersistedCookie {
    fn into_param(self) -> CookieParam {
        let mut param = CookieParam::new(self.name, self.value);
        param.domain = Some(self.domain);
        param.path = self.path;
        param.secure = self.secure;
        param.http_only = self.http_only;
        param.expires = self
            .expires
            .filter(|&secs| secs >= 0.0)
            .map(TimeSinceEpoch::new);
        param.same_site = self.same_site.as_deref().and_then(|s| match s {
            "Strict" => Some(CookieSameSite::Strict),
            "Lax" => Some(CookieSameSite::Lax),
            "None" => Some(CookieSameSite::None),
            _ => None,
        });
        param
    }
}

/// Load a storage-state JSON file into CDP cookie parameters.
pub fn load_cookie_file(path: &Path) -> Result<Vec<CookieParam>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        BrowserError::CookieRestore(format!("cannot read {}: {e}", path.display()))
    })?;

    let state: StorageState = serde_json::from_str(&contents).map_err(|e| {
        BrowserError::CookieRestore(format!("cannot parse {}: {e}", path.display()))
    })?;

    tracing::debug!(
        "Loaded {} persisted cookies from {}",
        state.cookies.len(),
        path.display()
    );

    Ok(state
        .cookies
        .into_iter()
        .map(PersistedCookie::into_param)
        .collect())
}
