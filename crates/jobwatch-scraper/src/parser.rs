use crate::error::{Result, ScrapeError};
use crate::url_builder::normalize_job_link;
use jobwatch_core::{JobLink, SiteSelectors, PLACEHOLDER};
use scraper::{ElementRef, Html, Selector};

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::InvalidSelector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Reads job cards from a search results page.
pub struct ListingParser<'a> {
    selectors: &'a SiteSelectors,
    base_url: &'a str,
    host: &'a str,
}

impl<'a> ListingParser<'a> {
    pub fn new(selectors: &'a SiteSelectors, base_url: &'a str, host: &'a str) -> Self {
        Self {
            selectors,
            base_url,
            host,
        }
    }

    /// The first `limit` job cards. Cards without a usable link are dropped.
    pub fn parse(&self, html: &str, limit: usize) -> Result<Vec<JobLink>> {
        let card_selector = parse_selector(&self.selectors.job_card_link)?;
        let title_selector = parse_selector(&self.selectors.job_card_title)?;
        let document = Html::parse_document(html);

        let links = document
            .select(&card_selector)
            .take(limit)
            .filter_map(|card| {
                let link = normalize_job_link(
                    card.value().attr("href").unwrap_or_default(),
                    self.base_url,
                    self.host,
                );
                if link == PLACEHOLDER {
                    tracing::debug!("skipping job card without link");
                    return None;
                }

                let title = card
                    .select(&title_selector)
                    .next()
                    .map(|el| element_text(&el))
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| PLACEHOLDER.to_string());

                Some(JobLink { title, link })
            })
            .collect();

        Ok(links)
    }
}

/// Job function from the criteria list, or the placeholder.
///
/// The criteria item is found by a subheader containing "function" in any case.
pub fn parse_job_category(html: &str, selectors: &SiteSelectors) -> Result<String> {
    let item_selector = parse_selector(&selectors.criteria_item)?;
    let subheader_selector = parse_selector(&selectors.criteria_subheader)?;
    let text_selector = parse_selector(&selectors.criteria_text)?;
    let document = Html::parse_document(html);

    for item in document.select(&item_selector) {
        let Some(label) = item.select(&subheader_selector).next() else {
            continue;
        };
        if !element_text(&label).to_lowercase().contains("function") {
            continue;
        }

        let value = item
            .select(&text_selector)
            .next()
            .map(|el| element_text(&el))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        return Ok(value);
    }

    Ok(PLACEHOLDER.to_string())
}
