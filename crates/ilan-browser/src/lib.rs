//! Browser session and page fetching for the ilan scraper.
//!
//! Owns the single headless Chromium process shared by all concurrent
//! fetch units, restores persisted cookies, and provides the
//! fetch-one-results-page operation behind the [`FetchPage`] seam.

pub mod cookies;
pub mod error;
pub mod fetch;
pub mod session;

pub use error::{BrowserError, Result};
pub use fetch::{FetchPage, FetchedPage, SessionFetcher};
pub use session::Session;
