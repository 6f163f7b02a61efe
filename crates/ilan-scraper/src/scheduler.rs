//! Concurrency scheduler for the fetch-extract pipeline.
//!
//! One unit of work per page index, all launched together and bounded
//! by a shared semaphore. A unit acquires one gate slot, fetches its
//! page, extracts listings, updates statistics, sleeps a randomized
//! pacing delay and only then releases its slot. Units never cancel
//! each other; the fan-in step flattens whatever succeeded in
//! ascending page order regardless of completion order.

use crate::error::Result;
use crate::extractor::{extract_with_compiled, CompiledSelectors};
use crate::stats::RunStats;
use futures::stream::{FuturesUnordered, StreamExt};
use ilan_browser::{FetchPage, Session, SessionFetcher};
use ilan_core::{ListingRecord, PageRequest, ScraperConfig, StatsSnapshot};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use url::Url;

/// Tagged result of one unit of work.
#[derive(Debug, Clone)]
pub enum PageOutcome {
    /// Listings extracted from a successfully fetched page
    Records(Vec<ListingRecord>),
    /// The page could not be fetched or its markup never materialized
    Failed(String),
}

/// Aggregate result of one run.
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    /// All complete records, ordered by ascending page index
    pub records: Vec<ListingRecord>,
    /// Page indices that yielded no records due to fetch failure;
    /// the hook for a caller-level retry policy
    pub failed_pages: Vec<u32>,
    /// Counter values at the end of the run
    pub stats: StatsSnapshot,
}

/// Bounded-concurrency scrape engine.
///
/// Generic over the page fetcher so the scheduling behavior can be
/// tested without a browser.
pub struct ScrapeEngine<F: FetchPage> {
    fetcher: F,
    selectors: CompiledSelectors,
    base_url: Url,
    gate: Arc<Semaphore>,
    stats: RunStats,
    min_delay: Duration,
    max_delay: Duration,
}

impl<F: FetchPage> ScrapeEngine<F> {
    /// Build an engine from the run configuration.
    pub fn new(fetcher: F, config: &ScraperConfig) -> Result<Self> {
        Ok(Self {
            fetcher,
            selectors: CompiledSelectors::compile(&config.selectors)?,
            base_url: Url::parse(&config.site.base_url)?,
            gate: Arc::new(Semaphore::new(config.scraping.max_concurrency)),
            stats: RunStats::new(),
            min_delay: Duration::from_secs_f64(config.timing.min_delay_secs),
            max_delay: Duration::from_secs_f64(config.timing.max_delay_secs),
        })
    }

    /// Current counter values. Stable once `scrape_pages` has returned.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Scrape pages `1..=page_count` of `base_url` concurrently.
    ///
    /// A failed page degrades the result instead of aborting the run:
    /// it contributes nothing to `records` and shows up in
    /// `failed_pages`. `page_count == 0` returns an empty report
    /// without touching the fetcher.
    pub async fn scrape_pages(&self, base_url: &str, page_count: u32) -> ScrapeReport {
        let mut units = FuturesUnordered::new();
        for page_index in 1..=page_count {
            units.push(self.run_unit(PageRequest::new(base_url, page_index)));
        }

        let mut outcomes = Vec::with_capacity(page_count as usize);
        while let Some(outcome) = units.next().await {
            outcomes.push(outcome);
        }

        // Completion order is unordered; page order is restored by index.
        outcomes.sort_by_key(|(page_index, _)| *page_index);

        let mut records = Vec::new();
        let mut failed_pages = Vec::new();
        for (page_index, outcome) in outcomes {
            match outcome {
                PageOutcome::Records(mut page_records) => records.append(&mut page_records),
                PageOutcome::Failed(reason) => {
                    tracing::warn!("Page {} yielded no records: {}", page_index, reason);
                    failed_pages.push(page_index);
                }
            }
        }

        tracing::info!(
            "Scrape finished: {} listings from {} pages ({} failed)",
            records.len(),
            page_count,
            failed_pages.len()
        );

        ScrapeReport {
            records,
            failed_pages,
            stats: self.stats.snapshot(),
        }
    }

    /// Run one fetch-extract unit under the capacity gate.
    async fn run_unit(&self, request: PageRequest) -> (u32, PageOutcome) {
        let page_index = request.page_index;
        let Ok(_permit) = self.gate.acquire().await else {
            // The gate lives as long as the engine, so this is unreachable
            // in practice; degrade to a failed page rather than panic.
            return (page_index, PageOutcome::Failed("scheduler gate closed".to_string()));
        };

        let outcome = match self.fetcher.fetch(&request).await {
            Ok(page) => {
                let extraction =
                    extract_with_compiled(&page.html, &self.selectors, &self.base_url);
                self.stats
                    .record_page(extraction.records.len() as u64, extraction.incomplete);
                tracing::info!(
                    "Page {}: {} listings ({} incomplete)",
                    page_index,
                    extraction.records.len(),
                    extraction.incomplete
                );
                PageOutcome::Records(extraction.records)
            }
            Err(e) => PageOutcome::Failed(e.to_string()),
        };

        // Pacing applies per unit, while its slot is still held, so
        // admission rate degrades gracefully as concurrency rises.
        self.pacing_delay().await;

        (page_index, outcome)
    }

    /// Sleep a uniformly random duration from the configured interval.
    async fn pacing_delay(&self) {
        let delay = if self.max_delay > self.min_delay {
            let secs = rand::thread_rng()
                .gen_range(self.min_delay.as_secs_f64()..=self.max_delay.as_secs_f64());
            Duration::from_secs_f64(secs)
        } else {
            self.min_delay
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Scrape a site end to end: start a browser session, fan out over the
/// requested pages, and tear the session down on every exit path.
///
/// Only session startup failure aborts the run; with a running session
/// the report reflects whatever subset of pages succeeded.
pub async fn scrape_site(
    config: &ScraperConfig,
    base_url: &str,
    page_count: u32,
) -> Result<ScrapeReport> {
    let session = Arc::new(Session::new(config.browser.clone()));
    session.start().await?;

    let fetcher = SessionFetcher::new(
        session.clone(),
        config.selectors.listing_container.clone(),
        Duration::from_millis(config.timing.page_timeout_ms),
    );

    let engine = match ScrapeEngine::new(fetcher, config) {
        Ok(engine) => engine,
        Err(e) => {
            session.close().await;
            return Err(e);
        }
    };

    let report = engine.scrape_pages(base_url, page_count).await;
    session.close().await;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_rejects_invalid_base_url() {
        struct NeverFetch;

        #[async_trait::async_trait]
        impl FetchPage for NeverFetch {
            async fn fetch(
                &self,
                _request: &PageRequest,
            ) -> ilan_browser::Result<ilan_browser::FetchedPage> {
                unreachable!("fetch should not be called")
            }
        }

        let mut config = ScraperConfig::default();
        config.site.base_url = "not a url".to_string();
        assert!(ScrapeEngine::new(NeverFetch, &config).is_err());
    }
}
