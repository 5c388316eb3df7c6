//! Console rendering of a [`HealthSnapshot`]

use std::fmt;

use crate::config::OutputFormat;
use crate::metrics::{DiskReport, MetricSet, Unavailable};
use crate::snapshot::HealthSnapshot;

impl fmt::Display for HealthSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_section(f, "CPU Health", &self.cpu)?;
        write_section(f, "Memory Health", &self.memory)?;

        write!(f, "\nDisk Health:\n")?;
        for report in &self.disks {
            match report {
                DiskReport::Entry(entry) => {
                    for (name, value) in entry.fields() {
                        writeln!(f, " - {}: {}", name, value)?;
                    }
                }
                DiskReport::Error(description) => writeln!(f, " - Error: {}", description)?,
            }
        }

        write!(f, "\nFan Health:\n")?;
        writeln!(f, " - {}: {}", self.fan.name, self.fan.value)
    }
}

fn write_section(f: &mut fmt::Formatter<'_>, title: &str, set: &MetricSet) -> fmt::Result {
    write!(f, "\n{}:\n", title)?;
    for record in set.iter() {
        match record.value.unavailable() {
            // Whole-probe failures carry their own "Error:" prefix
            Some(Unavailable::Error(_)) if record.name == "Error" => writeln!(f, " - {}", record.value)?,
            _ => writeln!(f, " - {}: {}", record.name, record.value)?,
        }
    }
    Ok(())
}

/// Render `snapshot` for stdout
pub fn render(snapshot: &HealthSnapshot, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(snapshot.to_string()),
        OutputFormat::Json => serde_json::to_string(snapshot),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{DiskEntry, DiskHealth, MetricRecord, MetricValue};
    use chrono::{TimeZone, Utc};

    fn sample_snapshot() -> HealthSnapshot {
        HealthSnapshot {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            cpu: MetricSet::from(vec![
                MetricRecord::new("CPU Usage (%)", "%", MetricValue::rounded(12.0, 1)),
                MetricRecord::new("CPU Temperature (°C)", "°C", Unavailable::NotAvailable),
            ]),
            memory: MetricSet::from(vec![MetricRecord::error("counters unavailable")]),
            disks: vec![DiskReport::Entry(DiskEntry {
                device: "/dev/sda1".into(),
                mount_point: "/".into(),
                file_system: "ext4".into(),
                usage_percent: 40.25,
                health: DiskHealth::Passed,
            })],
            fan: MetricRecord::new("Fan Speed (RPM)", "RPM", Unavailable::Unsupported),
        }
    }

    #[test]
    fn test_text_layout() {
        let expected = "\nCPU Health:\n - CPU Usage (%): 12.0\n - CPU Temperature (°C): Not Available\n\
                        \nMemory Health:\n - Error: counters unavailable\n\
                        \nDisk Health:\n - Disk: /dev/sda1\n - Mount Point: /\n - File System: ext4\n - Usage (%): 40.3\n - Health: PASS\n\
                        \nFan Health:\n - Fan Speed (RPM): Not supported on this platform\n";
        assert_eq!(sample_snapshot().to_string(), expected);
    }

    #[test]
    fn test_json_is_single_line() {
        let rendered = render(&sample_snapshot(), OutputFormat::Json).unwrap();
        assert!(!rendered.contains('\n'));
        assert!(rendered.contains("\"timestamp\":\"2024-05-01T12:00:00Z\""));
        assert!(rendered.contains("\"Fan Health\":{\"Fan Speed (RPM)\":\"Not supported on this platform\"}"));
    }
}
