//! Aggregate health snapshot
//!
//! Runs the four probes in sequence. Probes contain their own failures, so
//! the assembler composes results without any error handling of its own.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::MonitorConfig;
use crate::execution::SystemCommandRunner;
use crate::metrics::{CpuProbe, DiskProbe, DiskReport, FanProbe, MemoryProbe, MetricRecord, MetricSet};
use crate::platform::PlatformId;
use crate::sensors::SensorReader;

/// One point-in-time report. A plain value with no identity across calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthSnapshot {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "CPU Health")]
    pub cpu: MetricSet,
    #[serde(rename = "Memory Health")]
    pub memory: MetricSet,
    #[serde(rename = "Disk Health")]
    pub disks: Vec<DiskReport>,
    #[serde(rename = "Fan Health")]
    pub fan: MetricRecord,
}

impl HealthSnapshot {
    /// Same records, markers and disks; measured numbers may differ
    pub fn same_shape(&self, other: &HealthSnapshot) -> bool {
        self.cpu.same_shape(&other.cpu)
            && self.memory.same_shape(&other.memory)
            && self.fan.name == other.fan.name
            && self.fan.value.same_kind(&other.fan.value)
            && self.disks.len() == other.disks.len()
            && self.disks.iter().zip(&other.disks).all(|pair| match pair {
                (DiskReport::Entry(a), DiskReport::Entry(b)) => {
                    a.device == b.device
                        && a.mount_point == b.mount_point
                        && a.file_system == b.file_system
                        && a.health == b.health
                }
                (DiskReport::Error(a), DiskReport::Error(b)) => a == b,
                _ => false,
            })
    }
}

/// Composes the probes into a [`HealthSnapshot`]
#[derive(Clone)]
pub struct SnapshotAssembler {
    platform: PlatformId,
    cpu: CpuProbe,
    memory: MemoryProbe,
    disk: DiskProbe,
    fan: FanProbe,
}

impl SnapshotAssembler {
    pub fn new(platform: PlatformId, reader: SensorReader) -> Self {
        Self {
            platform,
            cpu: CpuProbe::new(reader.clone(), platform),
            memory: MemoryProbe,
            disk: DiskProbe::new(reader.clone(), platform),
            fan: FanProbe::new(reader, platform),
        }
    }

    /// Probes for the current host, tuned by `config`
    pub fn from_config(config: &MonitorConfig) -> Self {
        let platform = PlatformId::current();
        let reader = SensorReader::new(Arc::new(SystemCommandRunner), config.smart_timeout());
        let assembler = Self::new(platform, reader);

        Self {
            cpu: assembler.cpu.with_sample_window(config.cpu_sample_window()),
            disk: assembler.disk.with_smart_tool(config.smart_tool()),
            ..assembler
        }
    }

    pub fn with_cpu_probe(mut self, probe: CpuProbe) -> Self {
        self.cpu = probe;
        self
    }

    pub fn with_disk_probe(mut self, probe: DiskProbe) -> Self {
        self.disk = probe;
        self
    }

    pub fn with_fan_probe(mut self, probe: FanProbe) -> Self {
        self.fan = probe;
        self
    }

    pub fn platform(&self) -> PlatformId {
        self.platform
    }

    /// Blocks for the CPU sample window plus any SMART invocations
    pub fn snapshot(&self) -> HealthSnapshot {
        info!("Starting hardware health check...");

        let cpu = self.cpu.sample();
        let memory = self.memory.sample();
        let disks = self.disk.sample();
        let fan = self.fan.sample();

        debug!("Health check complete: {} disk entries on {}", disks.len(), self.platform);

        HealthSnapshot {
            timestamp: Utc::now(),
            cpu,
            memory,
            disks,
            fan,
        }
    }
}
