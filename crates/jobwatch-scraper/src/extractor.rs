//! Job detail pages, one fresh browser session per job.

use crate::error::{Result, ScrapeError};
use crate::parser::parse_job_category;
use crate::settings::ScrapeSettings;
use jobwatch_browser::{BrowserActions, BrowserLauncher};
use jobwatch_core::{primary_location, Country, JobLink, JobRecord, PLACEHOLDER};
use std::time::Duration;

/// Trimmed text of `selector`, or the placeholder when it never shows up or is empty.
pub async fn safe_text(page: &dyn BrowserActions, selector: &str, timeout: Duration) -> String {
    if let Err(e) = page.wait_for_selector(selector, timeout).await {
        tracing::debug!(selector, "field not found: {}", e);
        return PLACEHOLDER.to_string();
    }

    match page.extract_text(selector).await {
        Ok(text) if !text.is_empty() => text,
        Ok(_) => PLACEHOLDER.to_string(),
        Err(e) => {
            tracing::debug!(selector, "field unreadable: {}", e);
            PLACEHOLDER.to_string()
        }
    }
}

pub struct DetailFetcher<'a> {
    launcher: &'a dyn BrowserLauncher,
    settings: &'a ScrapeSettings,
}

impl<'a> DetailFetcher<'a> {
    pub fn new(launcher: &'a dyn BrowserLauncher, settings: &'a ScrapeSettings) -> Self {
        Self { launcher, settings }
    }

    /// Scrape one job in its own browser session.
    ///
    /// The session is closed whether or not extraction succeeds.
    pub async fn fetch(&self, job: &JobLink, country: &Country) -> Result<JobRecord> {
        let page = self.launcher.launch().await?;
        let result = self.extract(page.as_ref(), job, country).await;

        if let Err(e) = page.close().await {
            tracing::warn!(link = %job.link, "Failed to close job browser: {}", e);
        }
        result
    }

    async fn extract(
        &self,
        page: &dyn BrowserActions,
        job: &JobLink,
        country: &Country,
    ) -> Result<JobRecord> {
        let selectors = &self.settings.selectors;
        let field_timeout = self.settings.field_timeout;

        page.navigate(&job.link, self.settings.navigation_timeout)
            .await?;
        page.wait_for_selector(&selectors.any_title(), self.settings.detail_ready_timeout)
            .await
            .map_err(|e| ScrapeError::DetailNotReady {
                link: job.link.clone(),
                reason: e.to_string(),
            })?;

        let mut record = JobRecord::placeholder(job.link.clone(), country);

        record.title = safe_text(page, &selectors.title, field_timeout).await;
        if record.title == PLACEHOLDER {
            record.title = safe_text(page, &selectors.title_fallback, field_timeout).await;
        }
        record.company = safe_text(page, &selectors.company, field_timeout).await;
        record.company_description =
            safe_text(page, &selectors.company_description, field_timeout).await;
        record.location =
            primary_location(&safe_text(page, &selectors.location, field_timeout).await);
        record.job_description = safe_text(page, &selectors.job_description, field_timeout).await;
        record.posted_time = safe_text(page, &selectors.posted_time, field_timeout).await;

        record.job_category = match page.content().await {
            Ok(html) => parse_job_category(&html, selectors).unwrap_or_else(|e| {
                tracing::debug!("job category unavailable: {}", e);
                PLACEHOLDER.to_string()
            }),
            Err(e) => {
                tracing::debug!("job category unavailable: {}", e);
                PLACEHOLDER.to_string()
            }
        };

        tracing::debug!(link = %job.link, title = %record.title, "job details extracted");
        Ok(record)
    }
}
