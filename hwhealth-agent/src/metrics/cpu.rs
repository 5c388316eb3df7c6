//! CPU utilization, topology, clock and temperature

use std::thread;
use std::time::Duration;
use sysinfo::System;
use tracing::debug;

use super::{MetricRecord, MetricSet, MetricValue, Unavailable};
use crate::platform::PlatformId;
use crate::sensors::{candidates_for, MetricKind, SensorReader, SensorSource};

pub const CPU_USAGE: &str = "CPU Usage (%)";
pub const CPU_TEMPERATURE: &str = "CPU Temperature (°C)";
pub const CPU_COUNT: &str = "CPU Count";
pub const CPU_FREQUENCY: &str = "CPU Frequency (MHz)";

/// Default utilization averaging window
pub const DEFAULT_SAMPLE_WINDOW: Duration = Duration::from_secs(1);

/// Samples CPU health. Blocks for the sample window on every call.
#[derive(Clone)]
pub struct CpuProbe {
    reader: SensorReader,
    temperature_sources: Vec<SensorSource>,
    sample_window: Duration,
}

impl CpuProbe {
    pub fn new(reader: SensorReader, platform: PlatformId) -> Self {
        Self {
            reader,
            temperature_sources: candidates_for(MetricKind::CpuTemperature, platform),
            sample_window: DEFAULT_SAMPLE_WINDOW,
        }
    }

    pub fn with_sample_window(mut self, window: Duration) -> Self {
        self.sample_window = window;
        self
    }

    pub fn with_temperature_sources(mut self, sources: Vec<SensorSource>) -> Self {
        self.temperature_sources = sources;
        self
    }

    pub fn sample(&self) -> MetricSet {
        let mut sys = System::new();

        // Usage is a delta between two refreshes
        sys.refresh_cpu_usage();
        thread::sleep(self.sample_window.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL));
        sys.refresh_cpu();

        let usage = MetricValue::rounded(f64::from(sys.global_cpu_info().cpu_usage()), 1);

        let core_count = match sys.cpus().len() {
            0 => MetricValue::Unavailable(Unavailable::NotAvailable),
            n => MetricValue::Integer(n as i64),
        };

        let frequency = sys
            .cpus()
            .first()
            .map(|cpu| cpu.frequency())
            .filter(|mhz| *mhz > 0)
            .map(|mhz| MetricValue::Integer(mhz as i64))
            .unwrap_or(MetricValue::Unavailable(Unavailable::NotAvailable));

        MetricSet::from(vec![
            MetricRecord::new(CPU_USAGE, "%", usage),
            MetricRecord::new(CPU_TEMPERATURE, "°C", self.read_temperature()),
            MetricRecord::new(CPU_COUNT, "cores", core_count),
            MetricRecord::new(CPU_FREQUENCY, "MHz", frequency),
        ])
    }

    /// First candidate that parses wins; raw unit is millidegrees Celsius
    pub fn read_temperature(&self) -> MetricValue {
        match self.reader.first_match(&self.temperature_sources, parse_millidegrees) {
            Ok(celsius) => MetricValue::Float(celsius),
            Err(e) => {
                debug!("CPU temperature unavailable: {}", e);
                MetricValue::Unavailable(Unavailable::NotAvailable)
            }
        }
    }
}

fn parse_millidegrees(raw: &str) -> Option<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|millidegrees| millidegrees / 1000.0)
}
