//! Jobwatch - continuous job listing collection across countries.
//!
//! Wires configuration, logging, the browser launcher, the job store and the
//! country scheduler together. The binary in `main.rs` only adds signal
//! handling on top of [`run`].

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use anyhow::Context;
use jobwatch_browser::{BrowserLauncher, ChromiumLauncher, LaunchOptions};
use jobwatch_core::{AppConfig, LoggingConfig};
use jobwatch_scheduler::{RunSummary, Scheduler};
use jobwatch_scraper::{ScrapeOrchestrator, ScrapeSettings};
use jobwatch_store::JobStore;
use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Initialize tracing with a console layer and an append-only log file.
///
/// `RUST_LOG` takes precedence over the configured filter.
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if let Some(parent) = config.log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("opening log file {}", config.log_file.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(log_file)),
        )
        .with(filter)
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(())
}

/// Browser launch options for the configured browser section.
#[must_use]
pub fn launch_options(config: &AppConfig) -> LaunchOptions {
    let browser = &config.browser;
    LaunchOptions {
        headless: browser.headless,
        no_sandbox: browser.no_sandbox,
        window_width: browser.window_width,
        window_height: browser.window_height,
        user_agent: (!browser.randomize_user_agent).then(|| browser.user_agent.clone()),
        request_timeout: browser.navigation_timeout(),
        chrome_executable: browser.chrome_executable.clone(),
        profile_dir: browser.profile_dir.clone(),
    }
}

/// Run the scraper with Chromium until cancelled or the cycle limit is reached.
pub async fn run(config: &AppConfig, cancel: &CancellationToken) -> anyhow::Result<RunSummary> {
    let launcher = Arc::new(ChromiumLauncher::new(launch_options(config)));
    run_with_launcher(config, launcher, cancel).await
}

/// Run the scraper with any browser launcher.
pub async fn run_with_launcher(
    config: &AppConfig,
    launcher: Arc<dyn BrowserLauncher>,
    cancel: &CancellationToken,
) -> anyhow::Result<RunSummary> {
    let countries = config.scraping.countries()?;
    let store = JobStore::open(&config.output.jobs_file)
        .with_context(|| format!("opening {}", config.output.jobs_file.display()))?;
    info!(
        path = %store.path().display(),
        existing = store.len(),
        countries = countries.len(),
        "starting job collection"
    );

    let scheduler = Scheduler::new(countries, config.scraping.country_delay())?
        .with_max_cycles(config.scraping.max_cycles);
    let orchestrator = ScrapeOrchestrator::new(launcher, ScrapeSettings::from_config(config), store);

    Ok(scheduler.run(&orchestrator, cancel).await)
}
