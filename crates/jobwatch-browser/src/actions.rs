use crate::error::{BrowserError, Result};
use std::time::Duration;

/// Page interactions for one page of one browser session.
///
/// Implementations never run two operations concurrently; callers await each
/// call before issuing the next.
#[async_trait::async_trait]
pub trait BrowserActions: Send + Sync {
    /// Navigate to a URL, failing if the page does not load within `timeout`
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<()>;

    /// Whether an element matching the selector is currently rendered
    async fn is_visible(&self, selector: &str) -> Result<bool>;

    /// Click the first element matching the selector
    async fn click(&self, selector: &str) -> Result<()>;

    /// Wait for a selector to appear
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Trimmed text of the first element matching the selector
    async fn extract_text(&self, selector: &str) -> Result<String>;

    /// Full HTML of the current page
    async fn content(&self) -> Result<String>;

    /// Close the page and its browser. Calling it twice is a no-op.
    async fn close(&self) -> Result<()>;
}

/// Opens isolated browser sessions.
///
/// Every call to [`BrowserLauncher::launch`] starts a fresh browser with one
/// blank page. The caller owns the session and must close it.
#[async_trait::async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// Launch a new session
    async fn launch(&self) -> Result<Box<dyn BrowserActions>>;
}

/// Helper to extract domain from URL
pub fn extract_domain(url: &str) -> Result<String> {
    let url = url::Url::parse(url)
        .map_err(|e| BrowserError::NavigationError(format!("Invalid URL: {}", e)))?;

    url.host_str()
        .ok_or_else(|| BrowserError::NavigationError("No host in URL".to_string()))
        .map(|s| s.to_string())
}
