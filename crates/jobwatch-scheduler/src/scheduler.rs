//! Country loop over the configured list, forever or for a fixed number of passes.

use crate::jobs::{CountryScanResult, RunSummary};
use jobwatch_core::Country;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("country list is empty")]
    EmptyCountryList,
}

/// Processes a single country. Failures are reported in the result, never raised.
#[async_trait::async_trait]
pub trait CountryScraper: Send + Sync {
    async fn scrape_country(&self, country: &Country) -> CountryScanResult;
}

/// Source of delays between countries.
#[async_trait::async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait::async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

fn delay_message(delay: Duration) -> String {
    format!(
        "Waiting for {} seconds before processing the next country...",
        delay.as_secs_f64()
    )
}

pub struct Scheduler<S = TokioSleeper> {
    countries: Vec<Country>,
    delay: Duration,
    max_cycles: Option<u32>,
    sleeper: S,
}

impl Scheduler<TokioSleeper> {
    pub fn new(countries: Vec<Country>, delay: Duration) -> Result<Self, SchedulerError> {
        if countries.is_empty() {
            return Err(SchedulerError::EmptyCountryList);
        }

        Ok(Self {
            countries,
            delay,
            max_cycles: None,
            sleeper: TokioSleeper,
        })
    }
}

impl<S: Sleeper> Scheduler<S> {
    /// Stop after `cycles` passes over the list (`None` runs forever).
    #[must_use]
    pub fn with_max_cycles(mut self, cycles: Option<u32>) -> Self {
        self.max_cycles = cycles;
        self
    }

    #[must_use]
    pub fn with_sleeper<T: Sleeper>(self, sleeper: T) -> Scheduler<T> {
        Scheduler {
            countries: self.countries,
            delay: self.delay,
            max_cycles: self.max_cycles,
            sleeper,
        }
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    /// Run until the cycle limit is reached or `cancel` fires.
    ///
    /// Cancellation is observed between countries and during the delay; a
    /// country already in progress is finished first.
    pub async fn run<C>(&self, scraper: &C, cancel: &CancellationToken) -> RunSummary
    where
        C: CountryScraper + ?Sized,
    {
        let mut summary = RunSummary::new();

        'cycles: loop {
            if self
                .max_cycles
                .is_some_and(|max| summary.cycles_completed >= max)
            {
                break;
            }

            for country in &self.countries {
                if cancel.is_cancelled() {
                    summary.cancelled = true;
                    break 'cycles;
                }

                let result = scraper.scrape_country(country).await;
                if !result.succeeded() {
                    warn!(
                        country = %country,
                        attempts = result.attempts,
                        "country skipped"
                    );
                }
                summary.record(&result);

                info!("{}", delay_message(self.delay));
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => {
                        summary.cancelled = true;
                        break 'cycles;
                    }
                    () = self.sleeper.sleep(self.delay) => {}
                }
            }

            summary.cycles_completed += 1;
            info!(
                cycle = summary.cycles_completed,
                jobs_saved = summary.jobs_saved,
                "Country list finished. Restarting from top..."
            );
        }

        let elapsed = chrono::Utc::now() - summary.started_at;
        info!(
            cycles = summary.cycles_completed,
            countries = summary.countries_attempted,
            failed = summary.countries_failed,
            jobs_saved = summary.jobs_saved,
            cancelled = summary.cancelled,
            elapsed_secs = elapsed.num_seconds(),
            "scheduler stopped"
        );
        summary
    }
}
