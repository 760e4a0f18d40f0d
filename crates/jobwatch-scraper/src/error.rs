use jobwatch_core::Country;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Invalid selector {selector}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Job page not ready at {link}: {reason}")]
    DetailNotReady { link: String, reason: String },

    #[error("Failed to process country {country} after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        country: Country,
        attempts: u32,
        last_error: String,
    },

    #[error("Browser error: {0}")]
    Browser(#[from] jobwatch_browser::BrowserError),

    #[error("Storage error: {0}")]
    Store(#[from] jobwatch_store::StoreError),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
