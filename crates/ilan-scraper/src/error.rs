//! Error types for the scrape pipeline.

use ilan_browser::BrowserError;
use thiserror::Error;

/// Errors surfaced by the scrape pipeline.
///
/// Only session startup failure aborts a run; page-level browser
/// errors are converted into per-page outcomes by the scheduler and
/// never appear here.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Browser session error (startup failures are fatal to the run)
    #[error("browser error: {0}")]
    Browser(#[from] BrowserError),

    /// A configured CSS selector could not be parsed
    #[error("invalid selector for {field}: {reason}")]
    Selector {
        /// Logical field name the selector belongs to
        field: &'static str,
        /// Parse failure description
        reason: String,
    },

    /// The configured site base URL is not a valid URL
    #[error("invalid base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
}

/// Result type alias using [`ScrapeError`].
pub type Result<T> = std::result::Result<T, ScrapeError>;
