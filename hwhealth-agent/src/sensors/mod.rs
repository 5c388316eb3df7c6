//! Raw sensor acquisition
//!
//! - [`SensorSource`]: where a raw value may come from (sysfs file or tool)
//! - [`SensorReader`]: defensive read primitive, failures come back as values
//! - [`catalog`]: per-platform candidate sources, first-match-wins

pub mod catalog;
mod reader;

pub use catalog::{candidates_for, MetricKind};
pub use reader::SensorReader;

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// One candidate location for a raw hardware metric
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorSource {
    /// Plain-text numeric file (sysfs/procfs)
    File(PathBuf),
    /// External tool, stdout is the raw value
    Command { program: String, args: Vec<String> },
}

impl SensorSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        SensorSource::File(path.into())
    }

    pub fn command(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        SensorSource::Command {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for SensorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorSource::File(path) => write!(f, "{}", path.display()),
            SensorSource::Command { program, args } => write!(f, "{} {}", program, args.join(" ")),
        }
    }
}

/// Why a sensor read produced no usable value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SensorError {
    #[error("source not found: {0}")]
    SourceAbsent(String),
    #[error("access denied: {0}")]
    AccessDenied(String),
    #[error("I/O failure: {0}")]
    Io(String),
    #[error("cannot parse {value:?} read from {origin}")]
    Parse { origin: String, value: String },
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("not supported on this platform")]
    PlatformUnsupported,
    #[error("enumeration failed: {0}")]
    Enumeration(String),
    /// The tool ran but exited non-zero; its stdout is kept for inspection
    #[error("{program} exited with status {code:?}")]
    CommandFailed {
        program: String,
        code: Option<i64>,
        stdout: String,
    },
}

/// Outcome of a single access attempt: trimmed raw text or an absence reason
pub type RawReading = Result<String, SensorError>;
