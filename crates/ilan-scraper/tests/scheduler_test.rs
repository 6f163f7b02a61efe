//! Scheduler behavior tests using an instrumented in-memory fetcher.
//!
//! No browser is involved: the mock serves canned listing markup with
//! per-page delays and failures, which makes completion order, gate
//! bounds and failure isolation observable.

use async_trait::async_trait;
use ilan_browser::{BrowserError, FetchPage, FetchedPage};
use ilan_core::{PageRequest, ScraperConfig};
use ilan_scraper::ScrapeEngine;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Canned results page with two complete listings and, optionally, one
/// incomplete listing (missing price).
fn listing_html(page_index: u32, with_incomplete_row: bool) -> String {
    let mut rows = String::new();
    for n in 1..=2 {
        rows.push_str(&format!(
            r#"<tr class="searchResultsItem">
                <td><a class="classifiedTitle" href="/ilan/{page_index}{n}">Listing {page_index}-{n}</a></td>
                <td><div class="searchResultsPriceValue">{n}.000 TL</div></td>
                <td><div class="searchResultsLocationValue">Kadıköy</div></td>
            </tr>"#
        ));
    }
    if with_incomplete_row {
        rows.push_str(
            r#"<tr class="searchResultsItem">
                <td><a class="classifiedTitle" href="/ilan/x">No price here</a></td>
                <td><div class="searchResultsLocationValue">Moda</div></td>
            </tr>"#,
        );
    }
    format!("<html><body><table>{rows}</table></body></html>")
}

/// In-memory fetcher that records how many fetches overlap.
struct MockFetcher {
    fail_pages: HashSet<u32>,
    delay_for: fn(u32) -> Duration,
    with_incomplete_row: bool,
    fetch_count: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockFetcher {
    fn new() -> Self {
        Self {
            fail_pages: HashSet::new(),
            delay_for: |_| Duration::ZERO,
            with_incomplete_row: false,
            fetch_count: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    fn with_failures(mut self, pages: impl IntoIterator<Item = u32>) -> Self {
        self.fail_pages = pages.into_iter().collect();
        self
    }

    fn with_delays(mut self, delay_for: fn(u32) -> Duration) -> Self {
        self.delay_for = delay_for;
        self
    }

    fn with_incomplete_rows(mut self) -> Self {
        self.with_incomplete_row = true;
        self
    }

    fn max_observed_concurrency(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn fetches(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FetchPage for &MockFetcher {
    async fn fetch(&self, request: &PageRequest) -> ilan_browser::Result<FetchedPage> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = (self.delay_for)(request.page_index);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_pages.contains(&request.page_index) {
            return Err(BrowserError::Timeout(format!(
                "navigation to {}",
                request.page_url()
            )));
        }

        Ok(FetchedPage {
            page_index: request.page_index,
            html: listing_html(request.page_index, self.with_incomplete_row),
        })
    }
}

/// Config with zero pacing delay so tests don't sleep needlessly.
fn test_config(max_concurrency: usize) -> ScraperConfig {
    let mut config = ScraperConfig::default();
    config.scraping.max_concurrency = max_concurrency;
    config.timing.min_delay_secs = 0.0;
    config.timing.max_delay_secs = 0.0;
    config
}

fn titles(report: &ilan_scraper::ScrapeReport) -> Vec<String> {
    report
        .records
        .iter()
        .map(|r| r.title.clone().unwrap_or_default())
        .collect()
}

#[tokio::test]
async fn test_records_preserve_page_order_under_concurrency() {
    // Later pages finish first; output order must still be by page index.
    let fetcher =
        MockFetcher::new().with_delays(|page| Duration::from_millis(u64::from(5 - page) * 25));
    let engine = ScrapeEngine::new(&fetcher, &test_config(4)).expect("build engine");

    let report = engine.scrape_pages("https://example.com/listings", 4).await;

    assert_eq!(
        titles(&report),
        vec![
            "Listing 1-1",
            "Listing 1-2",
            "Listing 2-1",
            "Listing 2-2",
            "Listing 3-1",
            "Listing 3-2",
            "Listing 4-1",
            "Listing 4-2",
        ]
    );
    assert!(report.failed_pages.is_empty());
}

#[tokio::test]
async fn test_gate_bounds_concurrent_units() {
    let fetcher = MockFetcher::new().with_delays(|_| Duration::from_millis(30));
    let engine = ScrapeEngine::new(&fetcher, &test_config(2)).expect("build engine");

    let report = engine.scrape_pages("https://example.com/listings", 8).await;

    assert_eq!(report.records.len(), 16);
    assert_eq!(fetcher.fetches(), 8);
    assert!(
        fetcher.max_observed_concurrency() <= 2,
        "observed {} concurrent fetches with a gate of 2",
        fetcher.max_observed_concurrency()
    );
}

#[tokio::test]
async fn test_failed_page_does_not_abort_siblings() {
    let fetcher = MockFetcher::new().with_failures([2]);
    let engine = ScrapeEngine::new(&fetcher, &test_config(3)).expect("build engine");

    let report = engine.scrape_pages("https://example.com/listings", 3).await;

    assert_eq!(
        titles(&report),
        vec!["Listing 1-1", "Listing 1-2", "Listing 3-1", "Listing 3-2"]
    );
    assert_eq!(report.failed_pages, vec![2]);
    assert_eq!(report.stats.pages_scraped, 2);
}

#[tokio::test]
async fn test_all_pages_failing_still_returns() {
    let fetcher = MockFetcher::new().with_failures([1, 2, 3]);
    let engine = ScrapeEngine::new(&fetcher, &test_config(2)).expect("build engine");

    let report = engine.scrape_pages("https://example.com/listings", 3).await;

    assert!(report.records.is_empty());
    assert_eq!(report.failed_pages, vec![1, 2, 3]);
    assert_eq!(report.stats.pages_scraped, 0);
    assert_eq!(report.stats.listings_found, 0);
}

#[tokio::test]
async fn test_zero_pages_touches_nothing() {
    let fetcher = MockFetcher::new();
    let engine = ScrapeEngine::new(&fetcher, &test_config(2)).expect("build engine");

    let report = engine.scrape_pages("https://example.com/listings", 0).await;

    assert!(report.records.is_empty());
    assert!(report.failed_pages.is_empty());
    assert_eq!(fetcher.fetches(), 0);
}

#[tokio::test]
async fn test_listings_found_matches_output_length() {
    let fetcher = MockFetcher::new().with_incomplete_rows().with_failures([4]);
    let engine = ScrapeEngine::new(&fetcher, &test_config(3)).expect("build engine");

    let report = engine.scrape_pages("https://example.com/listings", 5).await;

    assert_eq!(report.stats.listings_found, report.records.len() as u64);
    assert_eq!(report.stats.successful_extractions, report.stats.listings_found);
    // One incomplete row per successful page.
    assert_eq!(report.stats.failed_extractions, 4);
    assert_eq!(report.stats.pages_scraped, 4);
}

#[tokio::test]
async fn test_engine_stats_match_report_stats() {
    let fetcher = MockFetcher::new();
    let engine = ScrapeEngine::new(&fetcher, &test_config(2)).expect("build engine");

    let report = engine.scrape_pages("https://example.com/listings", 2).await;

    assert_eq!(engine.stats(), report.stats);
    assert_eq!(report.stats.listings_found, 4);
}
