//! Run statistics.
//!
//! Four monotonically increasing counters shared by every in-flight
//! unit of work. Atomic increments keep concurrent updates lossless;
//! reads after the run has joined need no further synchronization.

use ilan_core::StatsSnapshot;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counters for one scraper instance.
///
/// Reset only by constructing a new instance.
#[derive(Debug, Default)]
pub struct RunStats {
    pages_scraped: AtomicU64,
    listings_found: AtomicU64,
    successful_extractions: AtomicU64,
    failed_extractions: AtomicU64,
}

impl RunStats {
    /// Create a zeroed counter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one successfully fetched and extracted page.
    ///
    /// `kept` is the number of complete records emitted, `dropped` the
    /// number of incomplete items discarded. Failed pages do not count
    /// towards `pages_scraped`.
    pub fn record_page(&self, kept: u64, dropped: u64) {
        self.pages_scraped.fetch_add(1, Ordering::Relaxed);
        self.listings_found.fetch_add(kept, Ordering::Relaxed);
        self.successful_extractions.fetch_add(kept, Ordering::Relaxed);
        self.failed_extractions.fetch_add(dropped, Ordering::Relaxed);
    }

    /// Take a point-in-time copy of all counters.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            pages_scraped: self.pages_scraped.load(Ordering::Relaxed),
            listings_found: self.listings_found.load(Ordering::Relaxed),
            successful_extractions: self.successful_extractions.load(Ordering::Relaxed),
            failed_extractions: self.failed_extractions.load(Ordering::Relaxed),
        }
    }
}
