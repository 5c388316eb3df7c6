//! Repeat runner: one snapshot per interval until Ctrl-C

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use crate::config::{MonitorConfig, OutputFormat};
use crate::report;
use crate::snapshot::{HealthSnapshot, SnapshotAssembler};

pub struct Monitor {
    config: MonitorConfig,
    assembler: Arc<SnapshotAssembler>,
}

impl Monitor {
    pub fn new(config: MonitorConfig) -> Self {
        let assembler = Arc::new(SnapshotAssembler::from_config(&config));
        Self { config, assembler }
    }

    pub fn with_assembler(config: MonitorConfig, assembler: SnapshotAssembler) -> Self {
        Self {
            config,
            assembler: Arc::new(assembler),
        }
    }

    /// Loop until interrupted
    pub async fn run(&self) -> Result<()> {
        self.config.validate().context("Invalid monitor configuration")?;

        info!(
            "Monitoring {} every {}s",
            self.assembler.platform(),
            self.config.interval_secs
        );

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        let mut ticker = interval(self.config.interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                result = &mut shutdown => {
                    result.context("Failed to listen for Ctrl-C")?;
                    info!("Monitoring stopped by user");
                    return Ok(());
                }

                _ = ticker.tick() => {
                    if let Err(e) = self.check_once().await {
                        error!("Health check failed: {:#}", e);
                    }
                }
            }
        }
    }

    /// Take one snapshot and print it
    pub async fn check_once(&self) -> Result<HealthSnapshot> {
        let snapshot = self.take_snapshot().await?;
        println!("{}", Self::render(&snapshot, self.config.output)?);
        Ok(snapshot)
    }

    /// Snapshots block, so they run on the blocking pool
    pub async fn take_snapshot(&self) -> Result<HealthSnapshot> {
        let assembler = Arc::clone(&self.assembler);
        tokio::task::spawn_blocking(move || assembler.snapshot())
            .await
            .context("Snapshot task aborted")
    }

    fn render(snapshot: &HealthSnapshot, format: OutputFormat) -> Result<String> {
        report::render(snapshot, format).context("Failed to serialize health snapshot")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::testing::ScriptedRunner;
    use crate::metrics::{CpuProbe, FanProbe, MetricValue, Unavailable};
    use crate::platform::PlatformId;
    use crate::sensors::SensorReader;
    use std::time::Duration;

    fn monitor() -> Monitor {
        let reader = SensorReader::new(Arc::new(ScriptedRunner::new(Vec::new())), Duration::from_secs(1));
        let assembler = SnapshotAssembler::new(PlatformId::WindowsLike, reader.clone())
            .with_cpu_probe(CpuProbe::new(reader.clone(), PlatformId::WindowsLike).with_sample_window(Duration::ZERO))
            .with_fan_probe(FanProbe::new(reader, PlatformId::WindowsLike));
        Monitor::with_assembler(MonitorConfig::default(), assembler)
    }

    #[tokio::test]
    async fn test_snapshot_on_blocking_pool() {
        let snapshot = monitor().take_snapshot().await.unwrap();
        assert_eq!(snapshot.fan.value, MetricValue::Unavailable(Unavailable::Unsupported));
        assert_eq!(snapshot.cpu.len(), 4);
    }

    #[tokio::test]
    async fn test_check_once_json() {
        let mut monitor = monitor();
        monitor.config.output = OutputFormat::Json;
        let snapshot = monitor.check_once().await.unwrap();
        assert!(!snapshot.memory.is_empty());
    }

    #[tokio::test]
    async fn test_zero_interval_stops_before_scheduling() {
        let mut monitor = monitor();
        monitor.config.interval_secs = 0;
        let err = monitor.run().await.unwrap_err();
        assert!(format!("{:#}", err).contains("interval_secs"));
    }
}
