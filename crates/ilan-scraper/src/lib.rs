//! Ilan Scraper - Concurrent listing retrieval.
//!
//! This crate is the core of the scraper: a bounded-concurrency
//! fan-out that fetches N result pages over one shared browser
//! session, extracts structured listing records from the rendered
//! markup, and aggregates them in page order with deterministic run
//! statistics. Failures are isolated per page and per item; a run
//! always returns whatever it could extract and only aborts when the
//! browser session itself cannot start.
//!
//! # Example
//!
//! ```rust,ignore
//! use ilan_core::ScraperConfig;
//! use ilan_scraper::scrape_site;
//!
//! let config = ScraperConfig::load_with_env()?;
//! let run = scrape_site(&config, "https://www.sahibinden.com/kiralik-daire", 5).await?;
//! println!("{} listings over {} pages", run.records.len(), run.stats.pages_scraped);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
#[allow(missing_docs)]
pub mod extractor;
pub mod postprocess;
pub mod scheduler;
pub mod stats;

// Re-export commonly used types
pub use error::{Result, ScrapeError};
pub use extractor::{extract_listings, Extraction};
pub use postprocess::{clean_records, filter_by_price_range, remove_duplicates};
pub use scheduler::{scrape_site, PageOutcome, ScrapeEngine, ScrapeReport};
pub use stats::RunStats;
