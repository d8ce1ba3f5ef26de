//! Periodic sweep driver using tokio-cron-scheduler.
//!
//! Pure timing source: runs one eager sweep at startup and then invokes
//! `ScheduledRepository::sweep` on a fixed interval. All content logic
//! stays in the engine.

use std::time::Duration;

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use vellum_core::Engine;

/// Sweep driver configuration.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Enable the periodic sweep.
    pub enabled: bool,
    /// Interval between sweeps.
    pub interval: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(60),
        }
    }
}

impl SweepConfig {
    pub fn from_env() -> Self {
        Self {
            enabled: std::env::var("SCHEDULER_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            interval: std::env::var("SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(60)),
        }
    }
}

/// Sweep scheduler wrapper.
pub struct Scheduler {
    inner: JobScheduler,
    config: SweepConfig,
}

impl Scheduler {
    pub async fn new(config: SweepConfig) -> Result<Self, JobSchedulerError> {
        let inner = JobScheduler::new().await?;
        Ok(Self { inner, config })
    }

    /// Run one eager sweep, register the repeated job, and start ticking.
    pub async fn start(&self, engine: Engine) -> Result<(), JobSchedulerError> {
        if !self.config.enabled {
            tracing::info!("Sweep scheduler disabled");
            return Ok(());
        }

        run_sweep(&engine).await;

        let interval = self.config.interval;
        let job = Job::new_repeated_async(interval, move |_uuid, _lock| {
            let engine = engine.clone();
            Box::pin(async move {
                run_sweep(&engine).await;
            })
        })?;

        let id = self.inner.add(job).await?;
        self.inner.start().await?;
        tracing::info!(
            interval_secs = interval.as_secs(),
            job_id = %id,
            "Sweep scheduler started"
        );
        Ok(())
    }

    /// Stop the scheduler.
    pub async fn shutdown(&mut self) -> Result<(), JobSchedulerError> {
        self.inner.shutdown().await?;
        tracing::info!("Sweep scheduler stopped");
        Ok(())
    }
}

async fn run_sweep(engine: &Engine) {
    match engine.scheduled().sweep(engine.now()).await {
        Ok(0) => {}
        Ok(published) => tracing::info!(published, "sweep published due entries"),
        Err(err) => tracing::error!(error = %err, "sweep failed"),
    }
}
