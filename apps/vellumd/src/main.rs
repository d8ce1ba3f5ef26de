//! # Vellum Daemon
//!
//! Hosts the content engine over a JSON-file store and drives the periodic
//! publication sweep until interrupted.

use std::sync::Arc;

use vellum_core::Engine;
use vellum_infra::{JsonFileStore, Scheduler, SweepConfig};

mod config;
mod telemetry;

use config::AppConfig;
use telemetry::{TelemetryConfig, init_telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();
    tracing::info!(store_dir = %config.store_dir.display(), "Starting Vellum daemon");

    let store = Arc::new(JsonFileStore::open(&config.store_dir).await?);
    let engine = Engine::new(store);

    let mut scheduler = Scheduler::new(SweepConfig::from_env()).await?;
    scheduler.start(engine).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    scheduler.shutdown().await?;

    Ok(())
}
