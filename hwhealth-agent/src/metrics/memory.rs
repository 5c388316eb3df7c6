//! Physical memory and swap usage

use sysinfo::System;
use tracing::warn;

use super::{percent, MetricRecord, MetricSet, MetricValue, BYTES_PER_GIB};
use crate::sensors::SensorError;

pub const MEMORY_USAGE: &str = "Memory Usage (%)";
pub const TOTAL_MEMORY: &str = "Total Memory (GB)";
pub const AVAILABLE_MEMORY: &str = "Available Memory (GB)";
pub const SWAP_USAGE: &str = "Swap Usage (%)";
pub const SWAP_TOTAL: &str = "Swap Total (GB)";

/// Raw OS memory counters, in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryCounters {
    pub total: u64,
    pub available: u64,
    pub swap_total: u64,
    pub swap_used: u64,
}

impl MemoryCounters {
    pub fn query() -> Result<Self, SensorError> {
        let mut sys = System::new();
        sys.refresh_memory();

        let counters = MemoryCounters {
            total: sys.total_memory(),
            available: sys.available_memory(),
            swap_total: sys.total_swap(),
            swap_used: sys.used_swap(),
        };

        if counters.total == 0 {
            return Err(SensorError::Enumeration(
                "host reported no physical memory".to_string(),
            ));
        }
        Ok(counters)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MemoryProbe;

impl MemoryProbe {
    pub fn sample(&self) -> MetricSet {
        match MemoryCounters::query() {
            Ok(counters) => Self::normalize(&counters),
            Err(e) => {
                warn!("Error checking memory health: {}", e);
                MetricSet::from(vec![MetricRecord::error(e)])
            }
        }
    }

    /// Percentages to one decimal, sizes in GiB to exactly two
    pub fn normalize(counters: &MemoryCounters) -> MetricSet {
        let used = counters.total.saturating_sub(counters.available);

        MetricSet::from(vec![
            MetricRecord::new(MEMORY_USAGE, "%", MetricValue::rounded(percent(used, counters.total), 1)),
            MetricRecord::new(TOTAL_MEMORY, "GB", gib(counters.total)),
            MetricRecord::new(AVAILABLE_MEMORY, "GB", gib(counters.available)),
            MetricRecord::new(
                SWAP_USAGE,
                "%",
                MetricValue::rounded(percent(counters.swap_used, counters.swap_total), 1),
            ),
            MetricRecord::new(SWAP_TOTAL, "GB", gib(counters.swap_total)),
        ])
    }
}

fn gib(bytes: u64) -> MetricValue {
    MetricValue::rounded(bytes as f64 / BYTES_PER_GIB, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIB: u64 = 1024 * 1024 * 1024;

    #[test]
    fn test_normalize_counters() {
        let counters = MemoryCounters {
            total: 16 * GIB,
            available: 4 * GIB,
            swap_total: 2 * GIB,
            swap_used: GIB / 2,
        };
        let set = MemoryProbe::normalize(&counters);

        assert_eq!(set.get(MEMORY_USAGE).and_then(MetricValue::as_f64), Some(75.0));
        assert_eq!(set.get(TOTAL_MEMORY).and_then(MetricValue::as_f64), Some(16.0));
        assert_eq!(set.get(AVAILABLE_MEMORY).and_then(MetricValue::as_f64), Some(4.0));
        assert_eq!(set.get(SWAP_USAGE).and_then(MetricValue::as_f64), Some(25.0));
        assert_eq!(set.get(SWAP_TOTAL).and_then(MetricValue::as_f64), Some(2.0));
    }

    #[test]
    fn test_sizes_have_two_decimals() {
        for total in [1u64, 1023, 7 * GIB / 3, 123_456_789_012, u64::MAX / 4] {
            let counters = MemoryCounters {
                total,
                available: total / 3,
                swap_total: total / 7,
                swap_used: 0,
            };
            let set = MemoryProbe::normalize(&counters);
            for name in [TOTAL_MEMORY, AVAILABLE_MEMORY, SWAP_TOTAL] {
                let value = set.get(name).unwrap();
                let text = value.to_string();
                let decimals = text.split('.').nth(1).map(str::len);
                assert_eq!(decimals, Some(2), "{} rendered as {}", name, text);
            }
        }
    }

    #[test]
    fn test_no_swap_is_zero_percent() {
        let counters = MemoryCounters {
            total: 8 * GIB,
            available: 8 * GIB,
            swap_total: 0,
            swap_used: 0,
        };
        let set = MemoryProbe::normalize(&counters);
        assert_eq!(set.get(SWAP_USAGE).and_then(MetricValue::as_f64), Some(0.0));
        assert_eq!(set.get(SWAP_TOTAL).map(|v| v.to_string()), Some("0.00".to_string()));
    }

    #[test]
    fn test_memory_sample_live() {
        let set = MemoryProbe.sample();
        assert_eq!(set.len(), 5);
        assert!(set.get(TOTAL_MEMORY).and_then(MetricValue::as_f64).unwrap() > 0.0);
    }
}
