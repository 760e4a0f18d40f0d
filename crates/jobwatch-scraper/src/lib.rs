//! Jobwatch Scraper - job search scraping per country.
//!
//! Drives browser sessions over a job search site: builds the search URL for a
//! country, dismisses the sign-in modal, narrows results to recent postings,
//! reads job links and scrapes each job page in a fresh session. Records are
//! appended to the [`jobwatch_store::JobStore`] one at a time.
//!
//! # Features
//!
//! - Flat per-country retry counter, no backoff
//! - Unfiltered fallback when the date filter fails or finds nothing
//! - Field-level placeholders so a record is saved even when fields are missing
//! - Every browser session is closed, including on errors
//!
//! # Example
//!
//! ```rust,ignore
//! use jobwatch_scraper::{ScrapeOrchestrator, ScrapeSettings};
//! use jobwatch_scheduler::CountryScraper;
//! use std::sync::Arc;
//!
//! let orchestrator = ScrapeOrchestrator::new(
//!     Arc::new(launcher),
//!     ScrapeSettings::from_config(&config),
//!     JobStore::open(&config.output.jobs_file)?,
//! );
//!
//! let result = orchestrator.scrape_country(&country).await;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

#[allow(missing_docs)]
pub mod error;
#[allow(missing_docs)]
pub mod extractor;
#[allow(missing_docs)]
pub mod filter;
#[allow(missing_docs)]
pub mod orchestrator;
#[allow(missing_docs)]
pub mod parser;
pub mod settings;
#[allow(missing_docs)]
pub mod url_builder;

pub use error::{Result, ScrapeError};
pub use extractor::{safe_text, DetailFetcher};
pub use filter::{apply_recent_filter, discover_job_links, dismiss_modal, FilterOutcome, LinkDiscovery};
pub use orchestrator::ScrapeOrchestrator;
pub use parser::{parse_job_category, ListingParser};
pub use settings::ScrapeSettings;
pub use url_builder::{build_search_url, normalize_job_link};
