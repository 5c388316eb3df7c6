//! Fan speed from hwmon sensors

use tracing::debug;

use super::{MetricRecord, MetricValue, Unavailable};
use crate::platform::PlatformId;
use crate::sensors::{candidates_for, MetricKind, SensorReader, SensorSource};

pub const FAN_SPEED: &str = "Fan Speed (RPM)";

#[derive(Clone)]
pub struct FanProbe {
    reader: SensorReader,
    sources: Vec<SensorSource>,
}

impl FanProbe {
    pub fn new(reader: SensorReader, platform: PlatformId) -> Self {
        Self {
            reader,
            sources: candidates_for(MetricKind::FanSpeed, platform),
        }
    }

    pub fn with_sources(mut self, sources: Vec<SensorSource>) -> Self {
        self.sources = sources;
        self
    }

    pub fn sample(&self) -> MetricRecord {
        if self.sources.is_empty() {
            return MetricRecord::new(FAN_SPEED, "RPM", Unavailable::Unsupported);
        }

        match self.reader.first_match(&self.sources, |raw| raw.parse::<i64>().ok()) {
            Ok(rpm) => MetricRecord::new(FAN_SPEED, "RPM", MetricValue::Integer(rpm)),
            Err(e) => {
                debug!("No usable fan sensor: {}", e);
                MetricRecord::new(FAN_SPEED, "RPM", Unavailable::NoFanSensor)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_platforms() {
        for platform in [PlatformId::WindowsLike, PlatformId::DarwinLike, PlatformId::Other] {
            let record = FanProbe::new(SensorReader::system(), platform).sample();
            assert_eq!(record.value, MetricValue::Unavailable(Unavailable::Unsupported));
            assert_eq!(record.value.to_string(), "Not supported on this platform");
        }
    }

    #[test]
    fn test_first_integer_wins() {
        let dir = tempfile::tempdir().unwrap();
        let hwmon0 = dir.path().join("fan1_input_0");
        let hwmon1 = dir.path().join("fan1_input_1");
        std::fs::write(&hwmon0, "12.5\n").unwrap();
        std::fs::write(&hwmon1, "2150\n").unwrap();

        let probe = FanProbe::new(SensorReader::system(), PlatformId::LinuxLike)
            .with_sources(vec![SensorSource::file(&hwmon0), SensorSource::file(&hwmon1)]);
        let record = probe.sample();
        assert_eq!(record.name, FAN_SPEED);
        assert_eq!(record.value, MetricValue::Integer(2150));
    }

    #[test]
    fn test_no_sensor_found() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("fan1_input");
        std::fs::write(&empty, "\n").unwrap();

        let probe = FanProbe::new(SensorReader::system(), PlatformId::LinuxLike).with_sources(vec![
            SensorSource::file(dir.path().join("missing")),
            SensorSource::file(&empty),
        ]);
        assert_eq!(
            probe.sample().value,
            MetricValue::Unavailable(Unavailable::NoFanSensor)
        );
    }
}
