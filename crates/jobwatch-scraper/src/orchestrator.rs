//! Per-country scraping with a flat retry counter.
//!
//! Each attempt opens a search session and discovers job links, closes it,
//! then fetches every job in its own session, appending each record to the
//! store as soon as it is extracted. Attempts are retried without backoff;
//! a retried attempt fetches all of its jobs again.

use crate::error::{Result, ScrapeError};
use crate::extractor::DetailFetcher;
use crate::filter::{discover_job_links, dismiss_modal};
use crate::settings::ScrapeSettings;
use crate::url_builder::build_search_url;
use jobwatch_browser::{clear_profile_dir, BrowserActions, BrowserLauncher};
use jobwatch_core::{Country, JobLink};
use jobwatch_scheduler::{CountryScanResult, CountryScraper};
use jobwatch_store::JobStore;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// Log line announcing the next attempt, if another one follows.
fn retry_message(country: &Country, attempts: u32, max_retries: u32) -> Option<String> {
    (attempts < max_retries)
        .then(|| format!("Retrying country {country} ({attempts}/{max_retries})..."))
}

/// Scrapes countries into a [`JobStore`].
pub struct ScrapeOrchestrator {
    launcher: Arc<dyn BrowserLauncher>,
    settings: ScrapeSettings,
    store: Mutex<JobStore>,
}

impl ScrapeOrchestrator {
    #[must_use]
    pub fn new(launcher: Arc<dyn BrowserLauncher>, settings: ScrapeSettings, store: JobStore) -> Self {
        Self {
            launcher,
            settings,
            store: Mutex::new(store),
        }
    }

    pub fn settings(&self) -> &ScrapeSettings {
        &self.settings
    }

    pub async fn store(&self) -> MutexGuard<'_, JobStore> {
        self.store.lock().await
    }

    pub fn into_store(self) -> JobStore {
        self.store.into_inner()
    }

    fn clear_profile(&self) {
        let Some(dir) = &self.settings.profile_dir else {
            return;
        };
        if let Err(e) = clear_profile_dir(dir) {
            tracing::warn!(path = %dir.display(), "Failed to clear browser profile: {}", e);
        }
    }

    /// One attempt: a search session, then one session per job.
    ///
    /// The search session is closed before any job session is launched, so
    /// at most one browser runs at a time. Returns the number of links
    /// found. `saved` counts records appended.
    async fn attempt(&self, country: &Country, saved: &mut usize) -> Result<usize> {
        let links = self.collect_links(country).await?;
        self.fetch_jobs(&links, country, saved).await;
        Ok(links.len())
    }

    async fn collect_links(&self, country: &Country) -> Result<Vec<JobLink>> {
        let page = self.launcher.launch().await?;
        let result = self.search(page.as_ref(), country).await;

        if let Err(e) = page.close().await {
            tracing::warn!("Failed to close browser for country {}: {}", country, e);
        }
        tracing::info!("Browser closed for country: {}", country);
        result
    }

    async fn search(&self, page: &dyn BrowserActions, country: &Country) -> Result<Vec<JobLink>> {
        let search_url = build_search_url(&self.settings.search_url_template, country);
        tracing::debug!(url = %search_url, "opening search page");

        page.navigate(&search_url, self.settings.navigation_timeout)
            .await?;
        dismiss_modal(page, &self.settings.selectors).await;

        let discovery = discover_job_links(page, &self.settings, &search_url, country).await?;
        tracing::info!(
            "Found {} job links for country: {}",
            discovery.links.len(),
            country
        );
        Ok(discovery.links)
    }

    /// Fetch and store each job. Failures skip the job.
    async fn fetch_jobs(&self, links: &[JobLink], country: &Country, saved: &mut usize) {
        let fetcher = DetailFetcher::new(self.launcher.as_ref(), &self.settings);
        for job in links {
            let record = match fetcher.fetch(job, country).await {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!(link = %job.link, "Failed to fetch details for job: {}", e);
                    continue;
                }
            };

            let title = record.title.clone();
            match self.store.lock().await.append(record) {
                Ok(()) => {
                    *saved += 1;
                    tracing::info!(country = %country, "Saved job: {}", title);
                }
                Err(e) => {
                    tracing::error!(link = %job.link, "Failed to save job details: {}", e);
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl CountryScraper for ScrapeOrchestrator {
    async fn scrape_country(&self, country: &Country) -> CountryScanResult {
        tracing::info!("Processing country: {}", country);
        self.clear_profile();

        let max_retries = self.settings.max_retries.max(1);
        let mut attempts = 0;
        let mut saved = 0;
        let mut last_error = String::new();

        while attempts < max_retries {
            attempts += 1;
            match self.attempt(country, &mut saved).await {
                Ok(found) => {
                    return CountryScanResult {
                        country: country.clone(),
                        attempts,
                        jobs_found: found,
                        jobs_saved: saved,
                        error: None,
                    };
                }
                Err(e) => {
                    tracing::warn!("Error processing country {}: {}", country, e);
                    if let Some(message) = retry_message(country, attempts, max_retries) {
                        tracing::info!("{}", message);
                    }
                    last_error = e.to_string();
                }
            }
        }

        let exhausted = ScrapeError::RetriesExhausted {
            country: country.clone(),
            attempts,
            last_error,
        };
        tracing::error!(
            "Failed to process country {} after {} retries.",
            country,
            max_retries
        );

        CountryScanResult {
            country: country.clone(),
            attempts,
            jobs_found: 0,
            jobs_saved: saved,
            error: Some(exhausted.to_string()),
        }
    }
}
