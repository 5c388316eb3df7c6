//! hwhealth agent - local hardware health snapshots
//!
//! Samples host health on demand:
//! - CPU usage, core count, clock and temperature
//! - Memory and swap usage
//! - Disk capacity and SMART status
//! - Fan speed
//!
//! [`SnapshotAssembler::snapshot`] is the synchronous entry point. Scheduling
//! and output live in [`monitor`].

pub mod config;
pub mod execution;
pub mod metrics;
pub mod monitor;
pub mod platform;
pub mod report;
pub mod sensors;
pub mod snapshot;

pub use config::MonitorConfig;
pub use monitor::Monitor;
pub use platform::PlatformId;
pub use snapshot::{HealthSnapshot, SnapshotAssembler};
