use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrowserError>;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("failed to start browser session: {0}")]
    SessionStart(String),

    #[error("failed to restore persisted cookies: {0}")]
    CookieRestore(String),

    #[error("browser session not started")]
    NotStarted,

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("selector not found: {0}")]
    SelectorNotFound(String),

    #[error("timeout: {0}")]
    Timeout(String),
}

impl BrowserError {
    /// Session-startup failures are the only fatal errors; everything
    /// else is recovered at the per-page level.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::SessionStart(_) | Self::CookieRestore(_) | Self::NotStarted
        )
    }
}
