//! Scrape settings resolved from the application configuration.

use jobwatch_core::{AppConfig, SiteSelectors};
use std::path::PathBuf;
use std::time::Duration;

/// Everything the scraper needs from [`AppConfig`], with durations resolved.
#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    /// Search URL with a `{country}` placeholder
    pub search_url_template: String,
    /// Canonical origin for job links
    pub base_url: String,
    /// Host suffix identifying site links
    pub host: String,
    pub selectors: SiteSelectors,
    /// Attempts per country
    pub max_retries: u32,
    /// Job links taken per search page
    pub max_jobs: usize,
    pub apply_recent_filter: bool,
    pub navigation_timeout: Duration,
    pub detail_ready_timeout: Duration,
    pub field_timeout: Duration,
    pub filter_timeout: Duration,
    /// Browser profile directory cleared before each country
    pub profile_dir: Option<PathBuf>,
}

impl ScrapeSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            search_url_template: config.site.search_url_template.clone(),
            base_url: config.site.base_url.clone(),
            host: config.site.host.clone(),
            selectors: config.site.selectors.clone(),
            max_retries: config.scraping.max_retries,
            max_jobs: config.scraping.max_jobs_per_country,
            apply_recent_filter: config.scraping.apply_recent_filter,
            navigation_timeout: config.browser.navigation_timeout(),
            detail_ready_timeout: config.browser.detail_ready_timeout(),
            field_timeout: config.browser.field_timeout(),
            filter_timeout: config.browser.filter_timeout(),
            profile_dir: config.browser.profile_dir.clone(),
        }
    }
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}
