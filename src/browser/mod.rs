//! Browser automation seam for the directory search
//!
//! The crawl scheduler only sees [`SearchSession`]. The Chromium adapter in
//! `chromium` is the single place that knows the directory's page layout.

#[cfg(feature = "browser")]
mod chromium;

#[cfg(feature = "browser")]
pub use chromium::ChromiumDirectory;

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while driving the directory search
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Element not found: {selector}")]
    ElementNotFound { selector: String },

    #[error("Timed out after {secs}s while {action}")]
    Timeout { action: String, secs: u64 },

    #[error("Browser protocol error: {0}")]
    Protocol(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}

impl BrowserError {
    /// Returns true if retrying the same search could succeed
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::Launch(_) | Self::InvalidSelector(_))
    }
}

/// One open browser session able to run directory searches
///
/// A session is reused for every target of a run and must be closed
/// explicitly with [`SearchSession::close`].
#[async_trait]
pub trait SearchSession: Send {
    /// Searches the directory for `query` and returns the markup of every
    /// result page reached from the results list, in result order
    async fn search(&mut self, query: &str) -> Result<Vec<String>, BrowserError>;

    /// Shuts the session down; further searches are not allowed
    async fn close(&mut self) -> Result<(), BrowserError>;
}
