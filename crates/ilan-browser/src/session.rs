//! Browser session lifecycle.
//!
//! One [`Session`] owns one Chromium process and its shared
//! cookie/storage context for the whole run. It is started before any
//! unit of work is launched and closed after every unit has joined;
//! concurrent units only ever open and close tabs on it.

use crate::cookies;
use crate::error::{BrowserError, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetTimezoneOverrideParams;
use chromiumoxide::Page;
use futures_util::stream::StreamExt;
use ilan_core::BrowserSettings;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Launched browser process plus the task draining its CDP event stream.
struct SessionInner {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

/// Shared browser session for one scrape run.
pub struct Session {
    settings: BrowserSettings,
    inner: Mutex<Option<SessionInner>>,
    teardowns: AtomicU64,
}

impl Session {
    /// Create an unstarted session with the given browser settings.
    #[must_use]
    pub fn new(settings: BrowserSettings) -> Self {
        Self {
            settings,
            inner: Mutex::new(None),
            teardowns: AtomicU64::new(0),
        }
    }

    /// Launch the browser process and restore persisted cookies.
    ///
    /// Idempotent: calling `start` on an already started session is a
    /// no-op. A launch failure is fatal to the run; no pages are
    /// attempted after it.
    pub async fn start(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.is_some() {
            tracing::debug!("Session already started, ignoring start()");
            return Ok(());
        }

        // Parse the cookie file before launching so a bad file cannot
        // leave an orphaned browser process behind.
        let persisted_cookies = match &self.settings.cookie_file {
            Some(cookie_file) if cookie_file.exists() => {
                Some(cookies::load_cookie_file(cookie_file)?)
            }
            Some(cookie_file) => {
                tracing::debug!(
                    "Cookie file {} not found, starting with a clean context",
                    cookie_file.display()
                );
                None
            }
            None => None,
        };

        let config = self.build_browser_config()?;
        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::SessionStart(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser event error: {}", e);
                }
            }
        });

        if let Some(params) = persisted_cookies {
            let count = params.len();
            if let Err(e) = browser.set_cookies(params).await {
                // Tear the half-started session down before failing.
                if let Err(close_err) = browser.close().await {
                    tracing::warn!("Error while closing browser: {}", close_err);
                }
                handler_task.abort();
                return Err(BrowserError::CookieRestore(e.to_string()));
            }
            tracing::info!("Restored {} persisted cookies", count);
        }

        tracing::info!("Browser started (headless={})", self.settings.headless);
        *inner = Some(SessionInner {
            browser,
            handler_task,
        });
        Ok(())
    }

    /// Open a fresh isolated tab on the shared session.
    ///
    /// Each unit of work navigates in its own tab so that concurrent
    /// navigations cannot disturb each other.
    pub async fn new_page(&self) -> Result<Page> {
        let inner = self.inner.lock().await;
        let inner = inner.as_ref().ok_or(BrowserError::NotStarted)?;
        let page = inner
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::Navigation(format!("cannot open tab: {e}")))?;

        // Timezone is a per-target override, so it is applied to every
        // tab rather than at launch.
        if let Err(e) = page
            .execute(SetTimezoneOverrideParams::new(self.settings.timezone.clone()))
            .await
        {
            tracing::debug!("Cannot apply timezone override: {}", e);
        }

        Ok(page)
    }

    /// Tear down the browser process and its event handler task.
    ///
    /// Teardown errors are logged and swallowed so cleanup always
    /// completes; calling `close` twice (or on a never-started
    /// session) is a no-op.
    pub async fn close(&self) {
        let Some(mut inner) = self.inner.lock().await.take() else {
            tracing::debug!("Session already closed, ignoring close()");
            return;
        };

        if let Err(e) = inner.browser.close().await {
            tracing::warn!("Error while closing browser: {}", e);
        }
        if let Err(e) = inner.browser.wait().await {
            tracing::debug!("Browser process did not exit cleanly: {}", e);
        }
        inner.handler_task.abort();

        self.teardowns.fetch_add(1, Ordering::Relaxed);
        tracing::info!("Browser stopped");
    }

    /// Whether the browser is currently running.
    pub async fn is_started(&self) -> bool {
        self.inner.lock().await.is_some()
    }

    /// Number of times an actual teardown ran. Exactly 1 after any
    /// sequence of `close` calls on a started session.
    #[must_use]
    pub fn teardown_count(&self) -> u64 {
        self.teardowns.load(Ordering::Relaxed)
    }

    fn build_browser_config(&self) -> Result<BrowserConfig> {
        let settings = &self.settings;
        let mut args = vec![
            "--disable-blink-features=AutomationControlled".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--disable-gpu".to_string(),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            "--disable-extensions".to_string(),
            format!("--user-agent={}", settings.user_agent),
            format!("--lang={}", settings.locale),
        ];

        if let Some(proxy) = &settings.proxy_server {
            args.push(format!("--proxy-server={proxy}"));
        }

        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(settings.viewport_width, settings.viewport_height)
            .args(args);

        if !settings.headless {
            builder = builder.with_head();
        }

        builder.build().map_err(BrowserError::SessionStart)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("headless", &self.settings.headless)
            .field("teardowns", &self.teardowns.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unstarted_session_rejects_new_page() {
        let session = Session::new(BrowserSettings::default());
        let err = session.new_page().await.expect_err("should fail");
        assert!(matches!(err, BrowserError::NotStarted));
    }

    #[tokio::test]
    async fn test_close_without_start_is_noop() {
        let session = Session::new(BrowserSettings::default());
        session.close().await;
        session.close().await;
        assert_eq!(session.teardown_count(), 0);
        assert!(!session.is_started().await);
    }

    #[tokio::test]
    #[ignore = "Requires Chrome browser to be installed"]
    async fn test_start_is_idempotent_and_close_runs_once() {
        let session = Session::new(BrowserSettings::default());
        session.start().await.expect("start browser");
        session.start().await.expect("second start is a no-op");
        assert!(session.is_started().await);

        session.close().await;
        session.close().await;
        assert_eq!(session.teardown_count(), 1);
        assert!(!session.is_started().await);
    }
}
