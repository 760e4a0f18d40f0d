use jobwatch_core::AppConfig;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load_with_env()?;
    jobwatch_app::init_tracing(&config.logging)?;

    info!("Starting Jobwatch v{}", env!("CARGO_PKG_VERSION"));

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received, stopping after the current country");
                on_signal.cancel();
            }
            Err(e) => warn!("Failed to listen for interrupt: {}", e),
        }
    });

    let summary = jobwatch_app::run(&config, &cancel).await?;
    info!(
        cycles = summary.cycles_completed,
        jobs_saved = summary.jobs_saved,
        "Jobwatch stopped"
    );
    Ok(())
}
