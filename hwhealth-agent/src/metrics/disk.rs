//! Disk capacity and SMART health per mounted filesystem

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use sysinfo::Disks;
use tracing::{debug, warn};

use super::{percent, MetricValue, Unavailable};
use crate::platform::PlatformId;
use crate::sensors::{SensorError, SensorReader, SensorSource};

/// Filesystems where capacity and SMART semantics don't apply
const EXCLUDED_FILE_SYSTEMS: &[&str] = &[
    "nfs", "nfs4", "smbfs", "cifs", "smb3", "remote", // network
    "iso9660", "udf", "cdfs", // optical
];

/// Device name fragments of disks `smartctl` can talk to
const SMART_DEVICE_PATTERNS: &[&str] = &["sd", "nvme"];

pub const DEFAULT_SMART_TOOL: &str = "smartctl";

/// One mounted partition as reported by the OS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub device: String,
    pub mount_point: String,
    pub file_system: String,
    pub total_bytes: u64,
    pub available_bytes: u64,
}

impl Partition {
    fn is_excluded(&self) -> bool {
        self.device.contains("cdrom")
            || EXCLUDED_FILE_SYSTEMS
                .iter()
                .any(|fs| self.file_system.eq_ignore_ascii_case(fs))
    }
}

/// Enumerates mounted partitions
pub trait PartitionSource: Send + Sync {
    fn partitions(&self) -> Result<Vec<Partition>, SensorError>;
}

/// Partition listing from `sysinfo`
#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoPartitions;

impl PartitionSource for SysinfoPartitions {
    fn partitions(&self) -> Result<Vec<Partition>, SensorError> {
        let disks = Disks::new_with_refreshed_list();

        let partitions: Vec<Partition> = disks
            .list()
            .iter()
            .map(|disk| Partition {
                device: disk.name().to_string_lossy().to_string(),
                mount_point: disk.mount_point().to_string_lossy().to_string(),
                file_system: disk.file_system().to_string_lossy().to_string(),
                total_bytes: disk.total_space(),
                available_bytes: disk.available_space(),
            })
            .collect();

        // Every host has at least a root mount
        if partitions.is_empty() {
            return Err(SensorError::Enumeration(
                "no mounted partitions reported".to_string(),
            ));
        }
        Ok(partitions)
    }
}

/// Why a disk has no definite health verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthUnknown {
    /// Device or platform not eligible for a SMART query
    NotChecked,
    /// Tool missing, timed out or failed to run
    CheckUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskHealth {
    Passed,
    Failed,
    UnknownOrUnsupported(HealthUnknown),
}

impl DiskHealth {
    /// Interpret `smartctl --health` output
    pub fn from_smart_output(stdout: &str) -> Self {
        if stdout.contains("PASSED") {
            DiskHealth::Passed
        } else {
            DiskHealth::Failed
        }
    }
}

impl fmt::Display for DiskHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiskHealth::Passed => f.write_str("PASS"),
            DiskHealth::Failed => f.write_str("FAIL"),
            DiskHealth::UnknownOrUnsupported(HealthUnknown::NotChecked) => f.write_str("Unknown"),
            DiskHealth::UnknownOrUnsupported(HealthUnknown::CheckUnavailable) => {
                write!(f, "{}", Unavailable::SmartUnavailable)
            }
        }
    }
}

/// One mounted volume
#[derive(Debug, Clone, PartialEq)]
pub struct DiskEntry {
    pub device: String,
    pub mount_point: String,
    pub file_system: String,
    pub usage_percent: f64,
    pub health: DiskHealth,
}

impl DiskEntry {
    /// Field name / value pairs in report order
    pub fn fields(&self) -> [(&'static str, String); 5] {
        [
            ("Disk", self.device.clone()),
            ("Mount Point", self.mount_point.clone()),
            ("File System", self.file_system.clone()),
            ("Usage (%)", MetricValue::rounded(self.usage_percent, 1).to_string()),
            ("Health", self.health.to_string()),
        ]
    }
}

impl Serialize for DiskEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(5))?;
        map.serialize_entry("Disk", &self.device)?;
        map.serialize_entry("Mount Point", &self.mount_point)?;
        map.serialize_entry("File System", &self.file_system)?;
        map.serialize_entry("Usage (%)", &self.usage_percent)?;
        map.serialize_entry("Health", &self.health.to_string())?;
        map.end()
    }
}

/// Disk probe output item: a volume, or the reason none could be listed
#[derive(Debug, Clone, PartialEq)]
pub enum DiskReport {
    Entry(DiskEntry),
    Error(String),
}

impl Serialize for DiskReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DiskReport::Entry(entry) => entry.serialize(serializer),
            DiskReport::Error(description) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Error", description)?;
                map.end()
            }
        }
    }
}

#[derive(Clone)]
pub struct DiskProbe {
    reader: SensorReader,
    platform: PlatformId,
    partitions: Arc<dyn PartitionSource>,
    smart_tool: Option<String>,
}

impl DiskProbe {
    pub fn new(reader: SensorReader, platform: PlatformId) -> Self {
        Self {
            reader,
            platform,
            partitions: Arc::new(SysinfoPartitions),
            smart_tool: Some(DEFAULT_SMART_TOOL.to_string()),
        }
    }

    pub fn with_partition_source(mut self, source: Arc<dyn PartitionSource>) -> Self {
        self.partitions = source;
        self
    }

    /// `None` disables SMART queries entirely
    pub fn with_smart_tool(mut self, tool: Option<String>) -> Self {
        self.smart_tool = tool;
        self
    }

    pub fn sample(&self) -> Vec<DiskReport> {
        let partitions = match self.partitions.partitions() {
            Ok(partitions) => partitions,
            Err(e) => {
                warn!("Error checking disk health: {}", e);
                return vec![DiskReport::Error(e.to_string())];
            }
        };

        partitions
            .into_iter()
            .filter(|p| {
                let excluded = p.is_excluded();
                if excluded {
                    debug!("Skipping {} ({}) on {}", p.device, p.file_system, p.mount_point);
                }
                !excluded
            })
            .map(|p| DiskReport::Entry(self.inspect(p)))
            .collect()
    }

    fn inspect(&self, partition: Partition) -> DiskEntry {
        // sysinfo only reports total and available, so root-reserved blocks count as used
        let used = partition.total_bytes.saturating_sub(partition.available_bytes);
        let health = match &self.smart_tool {
            Some(tool) if self.is_smart_candidate(&partition.device) => self.check_health(tool, &partition.device),
            _ => DiskHealth::UnknownOrUnsupported(HealthUnknown::NotChecked),
        };

        DiskEntry {
            usage_percent: percent(used, partition.total_bytes),
            device: partition.device,
            mount_point: partition.mount_point,
            file_system: partition.file_system,
            health,
        }
    }

    /// Platform gate covers the whole device-name heuristic
    fn is_smart_candidate(&self, device: &str) -> bool {
        self.platform.exposes_block_devices()
            && SMART_DEVICE_PATTERNS.iter().any(|pattern| device.contains(pattern))
    }

    fn check_health(&self, tool: &str, device: &str) -> DiskHealth {
        let source = SensorSource::command(tool, ["--health", device]);

        match self.reader.read(&source) {
            Ok(stdout) => DiskHealth::from_smart_output(&stdout),
            // Bits 3 and up report disk state, the verdict is still printed
            Err(SensorError::CommandFailed { code: Some(code), stdout, .. })
                if !smart_invocation_failed(code) && !stdout.trim().is_empty() =>
            {
                DiskHealth::from_smart_output(&stdout)
            }
            Err(e) => {
                debug!(
                    "SMART check unavailable for {} (limit {:?}): {}",
                    device,
                    self.reader.command_timeout(),
                    e
                );
                DiskHealth::UnknownOrUnsupported(HealthUnknown::CheckUnavailable)
            }
        }
    }
}

/// smartctl exit bits 0-2: bad command line, device open failure, SMART command failure
fn smart_invocation_failed(code: i64) -> bool {
    code & 0b111 != 0
}
