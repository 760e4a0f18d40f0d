//! Job type definitions.

use chrono::{DateTime, Utc};
use jobwatch_core::Country;
use serde::{Deserialize, Serialize};

/// Outcome of processing one country.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountryScanResult {
    pub country: Country,
    /// Attempts made, including the successful one
    pub attempts: u32,
    /// Job links discovered by the successful attempt
    pub jobs_found: usize,
    /// Records appended to the store
    pub jobs_saved: usize,
    /// Last error if every attempt failed
    pub error: Option<String>,
}

impl CountryScanResult {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Totals for one run of the scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub cycles_completed: u32,
    pub countries_attempted: usize,
    pub countries_failed: usize,
    pub jobs_saved: usize,
    pub cancelled: bool,
}

impl RunSummary {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            cycles_completed: 0,
            countries_attempted: 0,
            countries_failed: 0,
            jobs_saved: 0,
            cancelled: false,
        }
    }

    pub fn record(&mut self, result: &CountryScanResult) {
        self.countries_attempted += 1;
        self.jobs_saved += result.jobs_saved;
        if !result.succeeded() {
            self.countries_failed += 1;
        }
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}
