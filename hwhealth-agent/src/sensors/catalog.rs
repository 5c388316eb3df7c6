//! Static per-platform sensor locations
//!
//! Candidates are ordered; callers stop at the first one that yields a
//! parseable value. An empty list means the metric is unsupported there.

use super::SensorSource;
use crate::platform::PlatformId;

/// Metric kinds that are resolved through sensor files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    CpuTemperature,
    FanSpeed,
}

const LINUX_CPU_TEMPERATURE: &[&str] = &[
    "/sys/class/thermal/thermal_zone0/temp",
    "/sys/class/hwmon/hwmon0/temp1_input",
];

const LINUX_FAN_SPEED: &[&str] = &[
    "/sys/class/hwmon/hwmon0/fan1_input",
    "/sys/class/hwmon/hwmon1/fan1_input",
];

/// Ordered candidate sources for `kind` on `platform`
pub fn candidates_for(kind: MetricKind, platform: PlatformId) -> Vec<SensorSource> {
    let paths: &[&str] = match (platform, kind) {
        (PlatformId::LinuxLike, MetricKind::CpuTemperature) => LINUX_CPU_TEMPERATURE,
        (PlatformId::LinuxLike, MetricKind::FanSpeed) => LINUX_FAN_SPEED,
        // Windows needs a vendor monitor service, macOS needs SMC privileges
        (PlatformId::WindowsLike | PlatformId::DarwinLike | PlatformId::Other, _) => &[],
    };

    paths.iter().map(|p| SensorSource::file(*p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linux_temperature_order() {
        let candidates = candidates_for(MetricKind::CpuTemperature, PlatformId::LinuxLike);
        assert_eq!(
            candidates,
            vec![
                SensorSource::file("/sys/class/thermal/thermal_zone0/temp"),
                SensorSource::file("/sys/class/hwmon/hwmon0/temp1_input"),
            ]
        );
    }

    #[test]
    fn test_linux_fan_candidates() {
        assert_eq!(candidates_for(MetricKind::FanSpeed, PlatformId::LinuxLike).len(), 2);
    }

    #[test]
    fn test_unsupported_platforms_are_empty() {
        for platform in [PlatformId::WindowsLike, PlatformId::DarwinLike, PlatformId::Other] {
            assert!(candidates_for(MetricKind::CpuTemperature, platform).is_empty());
            assert!(candidates_for(MetricKind::FanSpeed, platform).is_empty());
        }
    }
}
