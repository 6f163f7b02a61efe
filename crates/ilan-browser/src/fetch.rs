//! Fetching one rendered results page.
//!
//! A fetch opens one isolated tab on the shared session, navigates to
//! the paginated URL, waits for the listing container to materialize
//! and captures the rendered HTML. The tab is closed on every exit
//! path. Fetches never retry; a failed page is reported to the
//! scheduler and resubmission is the caller's policy.

use crate::error::{BrowserError, Result};
use crate::session::Session;
use async_trait::async_trait;
use chromiumoxide::Page;
use ilan_core::PageRequest;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};

/// Poll interval while waiting for the listing container selector.
const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Rendered HTML of one successfully fetched results page.
///
/// Scoped to the unit of work that produced it; the extractor
/// re-materializes the matched listing elements from the markup.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// 1-based index of the page this markup came from
    pub page_index: u32,
    /// Full rendered document markup
    pub html: String,
}

/// The seam between the scheduler and the browser.
///
/// Production uses [`SessionFetcher`]; scheduler tests substitute an
/// instrumented implementation.
#[async_trait]
pub trait FetchPage: Send + Sync {
    /// Fetch one results page, returning its rendered markup.
    async fn fetch(&self, request: &PageRequest) -> Result<FetchedPage>;
}

/// Fetches pages through a shared [`Session`].
pub struct SessionFetcher {
    session: Arc<Session>,
    listing_selector: String,
    page_timeout: Duration,
}

impl SessionFetcher {
    /// Create a fetcher over the given session.
    ///
    /// `listing_selector` is the container selector whose appearance
    /// marks the page as loaded; `page_timeout` bounds both navigation
    /// and the selector wait.
    #[must_use]
    pub fn new(session: Arc<Session>, listing_selector: String, page_timeout: Duration) -> Self {
        Self {
            session,
            listing_selector,
            page_timeout,
        }
    }

    async fn fetch_on_page(&self, page: &Page, url: &str) -> Result<String> {
        timeout(self.page_timeout, page.goto(url))
            .await
            .map_err(|_| BrowserError::Timeout(format!("navigation to {url}")))?
            .map_err(|e| BrowserError::Navigation(e.to_string()))?;

        self.wait_for_selector(page).await?;

        page.content()
            .await
            .map_err(|e| BrowserError::Navigation(format!("cannot read page content: {e}")))
    }

    /// Poll for the listing container until it appears or the page
    /// timeout elapses.
    async fn wait_for_selector(&self, page: &Page) -> Result<()> {
        let deadline = Instant::now() + self.page_timeout;
        loop {
            if page.find_element(&self.listing_selector).await.is_ok() {
                return Ok(());
            }
            if Instant::now() + SELECTOR_POLL_INTERVAL >= deadline {
                return Err(BrowserError::SelectorNotFound(
                    self.listing_selector.clone(),
                ));
            }
            sleep(SELECTOR_POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl FetchPage for SessionFetcher {
    async fn fetch(&self, request: &PageRequest) -> Result<FetchedPage> {
        let url = request.page_url();
        tracing::debug!("Fetching page {} ({})", request.page_index, url);

        let page = self.session.new_page().await?;
        let result = self.fetch_on_page(&page, &url).await;

        // The tab is released whether or not the fetch succeeded.
        if let Err(e) = page.close().await {
            tracing::debug!("Error closing tab for page {}: {}", request.page_index, e);
        }

        result.map(|html| FetchedPage {
            page_index: request.page_index,
            html,
        })
    }
}
