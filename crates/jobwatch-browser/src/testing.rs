//! In-memory browser sessions backed by HTML fixtures.
//!
//! [`FixtureLauncher`] hands out [`FixturePage`]s that serve registered HTML
//! per URL, answer selector queries with `scraper`, and follow registered
//! click transitions (for example a filter submit button that loads the
//! filtered results). Nothing waits: a selector that is absent fails at once.
//!
//! Launch and close counts are tracked so tests can assert that every session
//! was closed and that no two sessions were open at once.

use crate::actions::{BrowserActions, BrowserLauncher};
use crate::error::{BrowserError, Result};
use scraper::{Html, Selector};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const BLANK_PAGE: &str = "<html><head></head><body></body></html>";

/// Registered pages, click transitions and session bookkeeping.
#[derive(Debug, Default)]
pub struct FixtureSite {
    pages: HashMap<String, String>,
    transitions: HashMap<(String, String), String>,
    broken_urls: HashSet<String>,
    failing_launches: AtomicUsize,
    failing_reads: AtomicUsize,
    launches: AtomicUsize,
    closes: AtomicUsize,
    open_sessions: AtomicUsize,
    max_open_sessions: AtomicUsize,
    visits: Mutex<Vec<String>>,
}

impl FixtureSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` at `url`.
    #[must_use]
    pub fn page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    /// Clicking `selector` while on `url` loads `target`.
    #[must_use]
    pub fn on_click(
        mut self,
        url: impl Into<String>,
        selector: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.transitions
            .insert((url.into(), selector.into()), target.into());
        self
    }

    /// Navigation to `url` fails even if a page is registered.
    #[must_use]
    pub fn broken(mut self, url: impl Into<String>) -> Self {
        self.broken_urls.insert(url.into());
        self
    }

    /// The next `count` launches fail.
    #[must_use]
    pub fn fail_launches(self, count: usize) -> Self {
        self.failing_launches.store(count, Ordering::SeqCst);
        self
    }

    /// The next `count` calls to `content()` fail, as on a page still loading.
    #[must_use]
    pub fn fail_content(self, count: usize) -> Self {
        self.failing_reads.store(count, Ordering::SeqCst);
        self
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Most sessions that were open at the same time.
    pub fn max_open_sessions(&self) -> usize {
        self.max_open_sessions.load(Ordering::SeqCst)
    }

    /// Every URL navigated to, in order.
    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().map(|v| v.clone()).unwrap_or_default()
    }

    fn record_visit(&self, url: &str) {
        if let Ok(mut visits) = self.visits.lock() {
            visits.push(url.to_string());
        }
    }
}

/// Launcher producing [`FixturePage`] sessions over a shared [`FixtureSite`].
#[derive(Debug, Clone)]
pub struct FixtureLauncher {
    site: Arc<FixtureSite>,
}

impl FixtureLauncher {
    pub fn new(site: Arc<FixtureSite>) -> Self {
        Self { site }
    }

    pub fn site(&self) -> &Arc<FixtureSite> {
        &self.site
    }
}

#[async_trait::async_trait]
impl BrowserLauncher for FixtureLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserActions>> {
        let remaining = self.site.failing_launches.load(Ordering::SeqCst);
        if remaining > 0 {
            self.site
                .failing_launches
                .store(remaining - 1, Ordering::SeqCst);
            return Err(BrowserError::ChromiumError(
                "fixture launch failure".to_string(),
            ));
        }

        self.site.launches.fetch_add(1, Ordering::SeqCst);
        let open = self.site.open_sessions.fetch_add(1, Ordering::SeqCst) + 1;
        self.site.max_open_sessions.fetch_max(open, Ordering::SeqCst);
        Ok(Box::new(FixturePage {
            site: Arc::clone(&self.site),
            current: Mutex::new(None),
            closed: AtomicBool::new(false),
        }))
    }
}

/// One page of a fixture session.
#[derive(Debug)]
pub struct FixturePage {
    site: Arc<FixtureSite>,
    current: Mutex<Option<(String, String)>>,
    closed: AtomicBool,
}

impl FixturePage {
    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(BrowserError::Closed);
        }
        Ok(())
    }

    fn snapshot(&self) -> (String, String) {
        self.current
            .lock()
            .ok()
            .and_then(|current| current.clone())
            .unwrap_or_else(|| ("about:blank".to_string(), BLANK_PAGE.to_string()))
    }

    fn load(&self, url: &str) -> Result<()> {
        self.site.record_visit(url);

        if self.site.broken_urls.contains(url) {
            return Err(BrowserError::NavigationError(format!(
                "{url}: net::ERR_CONNECTION_RESET"
            )));
        }

        let html = self
            .site
            .pages
            .get(url)
            .cloned()
            .ok_or_else(|| BrowserError::NavigationError(format!("{url}: no fixture page")))?;

        if let Ok(mut current) = self.current.lock() {
            *current = Some((url.to_string(), html));
        }
        Ok(())
    }

    fn first_text(&self, selector: &str) -> Result<Option<String>> {
        let (_, html) = self.snapshot();
        let selector = Selector::parse(selector)
            .map_err(|e| BrowserError::ScriptError(format!("invalid selector {selector}: {e}")))?;
        let document = Html::parse_document(&html);
        let text = document
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string());
        Ok(text)
    }
}

#[async_trait::async_trait]
impl BrowserActions for FixturePage {
    async fn navigate(&self, url: &str, _timeout: Duration) -> Result<()> {
        self.ensure_open()?;
        self.load(url)
    }

    async fn is_visible(&self, selector: &str) -> Result<bool> {
        self.ensure_open()?;
        Ok(self.first_text(selector)?.is_some())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.ensure_open()?;
        if self.first_text(selector)?.is_none() {
            return Err(BrowserError::SelectorNotFound(selector.to_string()));
        }

        let (url, _) = self.snapshot();
        let target = self
            .site
            .transitions
            .get(&(url, selector.to_string()))
            .cloned();
        match target {
            Some(target) => self.load(&target),
            None => Ok(()),
        }
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        self.ensure_open()?;
        match self.first_text(selector)? {
            Some(_) => Ok(()),
            None => Err(BrowserError::Timeout(format!(
                "waiting for {selector} after {timeout:?}"
            ))),
        }
    }

    async fn extract_text(&self, selector: &str) -> Result<String> {
        self.ensure_open()?;
        self.first_text(selector)?
            .ok_or_else(|| BrowserError::SelectorNotFound(selector.to_string()))
    }

    async fn content(&self) -> Result<String> {
        self.ensure_open()?;
        let failing = self
            .site
            .failing_reads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if failing.is_ok() {
            return Err(BrowserError::ChromiumError(
                "Cannot find context with specified id".to_string(),
            ));
        }
        Ok(self.snapshot().1)
    }

    async fn close(&self) -> Result<()> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.site.closes.fetch_add(1, Ordering::SeqCst);
            self.site.open_sessions.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
