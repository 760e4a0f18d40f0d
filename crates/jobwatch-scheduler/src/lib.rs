pub mod jobs;
pub mod scheduler;

pub use jobs::{CountryScanResult, RunSummary};
pub use scheduler::{CountryScraper, Scheduler, SchedulerError, Sleeper, TokioSleeper};
