//! Jobwatch Store - persisted state for scraped job records.
//!
//! Records live in memory as an ordered list and are mirrored to a single
//! JSON array file after every insertion. There is no incremental format and
//! no deduplication: a rerun that scrapes the same job appends it again.
//!
//! # Example
//!
//! ```rust,ignore
//! use jobwatch_store::JobStore;
//!
//! let mut store = JobStore::open("linkedin_detailed_jobs.json")?;
//! store.append(record)?;
//! println!("{} jobs collected", store.len());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod error;
pub mod store;

pub use error::{Result, StoreError};
pub use store::JobStore;
