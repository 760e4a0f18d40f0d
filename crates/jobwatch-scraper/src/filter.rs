//! Search page interaction: modal dismissal, the "Past 24 hours" filter and
//! job link discovery with an unfiltered fallback.

use crate::error::Result;
use crate::parser::ListingParser;
use crate::settings::ScrapeSettings;
use jobwatch_browser::BrowserActions;
use jobwatch_core::{Country, JobLink, SiteSelectors};
use std::time::Duration;

/// What happened to the date filter on a search page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    Applied,
    Failed(String),
    /// Filtering turned off in configuration
    Disabled,
}

/// Links found on a search page and how they were found.
#[derive(Debug, Clone)]
pub struct LinkDiscovery {
    pub links: Vec<JobLink>,
    pub filter: FilterOutcome,
    /// The search page was reloaded without the filter
    pub fell_back: bool,
}

/// Close the sign-in modal if it is showing. Never fails.
pub async fn dismiss_modal(page: &dyn BrowserActions, selectors: &SiteSelectors) {
    let dismissed = match page.is_visible(&selectors.modal_dismiss).await {
        Ok(true) => page.click(&selectors.modal_dismiss).await.map(|()| true),
        Ok(false) => Ok(false),
        Err(e) => Err(e),
    };

    match dismissed {
        Ok(true) => tracing::info!("Modal dismissed successfully."),
        Ok(false) => tracing::debug!("no modal to dismiss"),
        Err(e) => tracing::warn!("Failed to dismiss modal: {}", e),
    }
}

/// Narrow the current search page to postings from the last day.
pub async fn apply_recent_filter(
    page: &dyn BrowserActions,
    selectors: &SiteSelectors,
    timeout: Duration,
) -> FilterOutcome {
    let applied = async {
        page.click(&selectors.filter_button).await?;
        page.wait_for_selector(&selectors.past_24_hours, timeout)
            .await?;
        page.click(&selectors.past_24_hours).await?;
        page.click(&selectors.filter_submit).await
    }
    .await;

    match applied {
        Ok(()) => {
            tracing::info!("\"Past 24 hours\" filter applied successfully.");
            FilterOutcome::Applied
        }
        Err(e) => {
            tracing::warn!("Failed to apply \"Past 24 hours\" filter: {}", e);
            FilterOutcome::Failed(e.to_string())
        }
    }
}

async fn read_links(page: &dyn BrowserActions, settings: &ScrapeSettings) -> Result<Vec<JobLink>> {
    let html = page.content().await?;
    ListingParser::new(&settings.selectors, &settings.base_url, &settings.host)
        .parse(&html, settings.max_jobs)
}

/// Collect job links from a search page that is already loaded.
///
/// When the filter fails, or leaves no links, the search URL is loaded again
/// without it and links are read from that page instead.
pub async fn discover_job_links(
    page: &dyn BrowserActions,
    settings: &ScrapeSettings,
    search_url: &str,
    country: &Country,
) -> Result<LinkDiscovery> {
    if !settings.apply_recent_filter {
        let links = read_links(page, settings).await?;
        return Ok(LinkDiscovery {
            links,
            filter: FilterOutcome::Disabled,
            fell_back: false,
        });
    }

    let mut filter = apply_recent_filter(page, &settings.selectors, settings.filter_timeout).await;
    if filter == FilterOutcome::Applied {
        match read_links(page, settings).await {
            Ok(links) if !links.is_empty() => {
                return Ok(LinkDiscovery {
                    links,
                    filter,
                    fell_back: false,
                });
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("Failed to read filtered job links: {}", e);
                filter = FilterOutcome::Failed(e.to_string());
            }
        }
    }

    tracing::info!(
        "No job links found or filter failed for country: {}. Navigating again without filter...",
        country
    );
    page.navigate(search_url, settings.navigation_timeout).await?;
    let links = read_links(page, settings).await?;

    Ok(LinkDiscovery {
        links,
        filter,
        fell_back: true,
    })
}
