//! Jobwatch Core - Foundation crate for the jobwatch scraper.
//!
//! This crate provides the shared job types, error handling and configuration
//! management that all other jobwatch crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths and env overrides
//! - [`types`] - Shared data model (`JobRecord`, `JobLink`, `Country`)
//!
//! # Example
//!
//! ```rust
//! use jobwatch_core::{AppConfig, Country, JobRecord};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let countries = config.scraping.countries()?;
//! assert!(!countries.is_empty());
//!
//! let record = JobRecord::placeholder("https://www.linkedin.com/jobs/view/1", &Country::new("Norway")?);
//! assert_eq!(record.company, jobwatch_core::PLACEHOLDER);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{
    AppConfig, BrowserConfig, LoggingConfig, OutputConfig, ScrapingConfig, SiteConfig,
    SiteSelectors,
};
pub use error::{ConfigError, ConfigResult, JobwatchError, Result};
pub use types::{primary_location, Country, JobLink, JobRecord, DEFAULT_COUNTRIES, PLACEHOLDER};
