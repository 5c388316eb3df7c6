//! hwhealth agent - periodic hardware health report
//!
//! Prints a CPU / memory / disk / fan report every configured interval
//! until interrupted with Ctrl-C.

use anyhow::{Context, Result};
use hwhealth_agent::{Monitor, MonitorConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = MonitorConfig::load()
        .await
        .context("Failed to load configuration")?;

    // RUST_LOG overrides the configured filter
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("hwhealth agent v{} starting...", env!("CARGO_PKG_VERSION"));

    Monitor::new(config)
        .run()
        .await
        .context("Monitor execution failed")?;

    Ok(())
}
