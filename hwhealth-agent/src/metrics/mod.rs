//! Hardware health metrics for the local host
//!
//! Provides one probe per subsystem, each degrading on its own:
//! - CPU usage, core count, frequency and temperature
//! - Memory and swap usage
//! - Disk capacity and SMART health for mounted filesystems
//! - Fan speed
//!
//! Probes never return errors. Anything they cannot determine is carried as
//! an explicit [`Unavailable`] marker inside the record.

pub mod cpu;
pub mod disk;
pub mod fan;
pub mod memory;

pub use cpu::CpuProbe;
pub use disk::{DiskEntry, DiskHealth, DiskProbe, DiskReport, HealthUnknown, Partition, PartitionSource, SysinfoPartitions};
pub use fan::FanProbe;
pub use memory::{MemoryCounters, MemoryProbe};

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;

pub(crate) const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Why a metric value is missing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unavailable {
    NotAvailable,
    SmartUnavailable,
    NoFanSensor,
    Unsupported,
    Error(String),
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unavailable::NotAvailable => f.write_str("Not Available"),
            Unavailable::SmartUnavailable => f.write_str("SMART check unavailable"),
            Unavailable::NoFanSensor => f.write_str("No fan sensor found"),
            Unavailable::Unsupported => f.write_str("Not supported on this platform"),
            Unavailable::Error(description) => write!(f, "Error: {}", description),
        }
    }
}

/// A metric value, or the reason it could not be determined
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Integer(i64),
    Float(f64),
    /// Value already rounded to `places` decimal digits
    Decimal { value: f64, places: usize },
    Unavailable(Unavailable),
}

impl MetricValue {
    pub fn rounded(value: f64, places: usize) -> Self {
        MetricValue::Decimal {
            value: round_to(value, places),
            places,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            MetricValue::Integer(v) => Some(v as f64),
            MetricValue::Float(v) => Some(v),
            MetricValue::Decimal { value, .. } => Some(value),
            MetricValue::Unavailable(_) => None,
        }
    }

    pub fn unavailable(&self) -> Option<&Unavailable> {
        match self {
            MetricValue::Unavailable(reason) => Some(reason),
            _ => None,
        }
    }

    /// Same variant, ignoring the measured quantity
    pub fn same_kind(&self, other: &MetricValue) -> bool {
        match (self, other) {
            (MetricValue::Unavailable(a), MetricValue::Unavailable(b)) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl From<Unavailable> for MetricValue {
    fn from(reason: Unavailable) -> Self {
        MetricValue::Unavailable(reason)
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Integer(v) => write!(f, "{}", v),
            // Whole floats keep one decimal so they read as measurements
            MetricValue::Float(v) if v.fract() == 0.0 => write!(f, "{:.1}", v),
            MetricValue::Float(v) => write!(f, "{}", v),
            MetricValue::Decimal { value, places } => write!(f, "{:.*}", places, value),
            MetricValue::Unavailable(reason) => write!(f, "{}", reason),
        }
    }
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetricValue::Integer(v) => serializer.serialize_i64(*v),
            MetricValue::Float(v) => serializer.serialize_f64(*v),
            MetricValue::Decimal { value, .. } => serializer.serialize_f64(*value),
            MetricValue::Unavailable(reason) => serializer.collect_str(reason),
        }
    }
}

/// One normalized observation
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    pub name: &'static str,
    pub value: MetricValue,
    pub unit: &'static str,
}

impl MetricRecord {
    pub fn new(name: &'static str, unit: &'static str, value: impl Into<MetricValue>) -> Self {
        Self {
            name,
            value: value.into(),
            unit,
        }
    }

    /// Whole-probe failure marker
    pub fn error(description: impl fmt::Display) -> Self {
        Self {
            name: "Error",
            value: MetricValue::Unavailable(Unavailable::Error(description.to_string())),
            unit: "",
        }
    }
}

impl Serialize for MetricRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.name, &self.value)?;
        map.end()
    }
}

/// Ordered records produced by one probe invocation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricSet(Vec<MetricRecord>);

impl MetricSet {
    pub fn get(&self, name: &str) -> Option<&MetricValue> {
        self.0.iter().find(|r| r.name == name).map(|r| &r.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricRecord> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names and value kinds match, measured numbers may differ
    pub fn same_shape(&self, other: &MetricSet) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.name == b.name && a.unit == b.unit && a.value.same_kind(&b.value))
    }
}

impl From<Vec<MetricRecord>> for MetricSet {
    fn from(records: Vec<MetricRecord>) -> Self {
        MetricSet(records)
    }
}

impl Serialize for MetricSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for record in &self.0 {
            map.serialize_entry(record.name, &record.value)?;
        }
        map.end()
    }
}

pub(crate) fn round_to(value: f64, places: usize) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// `part / whole` as a percentage rounded to one decimal, 0 when `whole` is 0
pub(crate) fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round_to(part as f64 / whole as f64 * 100.0, 1)
}
