//! statcache server binary.

use anyhow::Context;
use statcache_server::{AppState, Settings, metrics::init_metrics, run_server_with_state};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("Failed to load settings")?;

    // RUST_LOG tiene prioridad sobre logging.debug
    let default_level = if settings.logging.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting statcache server"
    );
    tracing::debug!(?settings, "Loaded settings");

    let addr = settings.addr()?;
    let prometheus_handle = init_metrics().context("Failed to install metrics recorder")?;

    let state = AppState::from_settings(&settings)
        .await
        .context("Failed to initialize application state")?;

    run_server_with_state(addr, state, prometheus_handle).await?;

    Ok(())
}
