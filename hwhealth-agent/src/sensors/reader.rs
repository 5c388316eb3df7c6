use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::{RawReading, SensorError, SensorSource};
use crate::execution::{CommandRunner, RunError, SystemCommandRunner};

/// Default bound for external tool invocations
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

/// Reads sensor sources without ever failing the caller.
///
/// Every failure is turned into a [`SensorError`] and logged at debug level.
/// Readings are never cached; each call hits the source again.
#[derive(Clone)]
pub struct SensorReader {
    runner: Arc<dyn CommandRunner>,
    command_timeout: Duration,
}

impl SensorReader {
    pub fn new(runner: Arc<dyn CommandRunner>, command_timeout: Duration) -> Self {
        Self {
            runner,
            command_timeout,
        }
    }

    /// Reader backed by real processes and the default 5s timeout
    pub fn system() -> Self {
        Self::new(Arc::new(SystemCommandRunner), DEFAULT_COMMAND_TIMEOUT)
    }

    pub fn command_timeout(&self) -> Duration {
        self.command_timeout
    }

    /// Read one source
    pub fn read(&self, source: &SensorSource) -> RawReading {
        let reading = match source {
            SensorSource::File(path) => read_file(path),
            SensorSource::Command { program, args } => self.run_command(program, args),
        };

        if let Err(e) = &reading {
            debug!("Could not read sensor {}: {}", source, e);
        }
        reading
    }

    /// Try `sources` in order and return the first value `parse` accepts.
    ///
    /// Unparseable values fall through to the next candidate. An empty
    /// candidate list yields [`SensorError::PlatformUnsupported`]; otherwise
    /// the error of the last candidate is returned.
    pub fn first_match<T, F>(&self, sources: &[SensorSource], parse: F) -> Result<T, SensorError>
    where
        F: Fn(&str) -> Option<T>,
    {
        let mut last_error = SensorError::PlatformUnsupported;

        for source in sources {
            match self.read(source) {
                Ok(raw) => match parse(&raw) {
                    Some(value) => return Ok(value),
                    None => {
                        debug!("Ignoring unparseable value {:?} from {}", raw, source);
                        last_error = SensorError::Parse {
                            origin: source.to_string(),
                            value: raw,
                        };
                    }
                },
                Err(e) => last_error = e,
            }
        }

        Err(last_error)
    }

    fn run_command(&self, program: &str, args: &[String]) -> RawReading {
        match self.runner.run(program, args, self.command_timeout) {
            Ok(output) if output.success() => Ok(output.stdout.trim().to_string()),
            Ok(output) => Err(SensorError::CommandFailed {
                program: program.to_string(),
                code: output.exit_code,
                stdout: output.stdout,
            }),
            Err(RunError::NotFound(p)) => Err(SensorError::SourceAbsent(p)),
            Err(RunError::PermissionDenied(p)) => Err(SensorError::AccessDenied(p)),
            Err(RunError::Timeout(limit)) => Err(SensorError::Timeout(limit)),
            Err(RunError::Io(e)) => Err(SensorError::Io(e.to_string())),
        }
    }
}

fn read_file(path: &Path) -> RawReading {
    fs::read_to_string(path)
        .map(|content| content.trim().to_string())
        .map_err(|e| {
            let origin = path.display().to_string();
            match e.kind() {
                io::ErrorKind::NotFound => SensorError::SourceAbsent(origin),
                io::ErrorKind::PermissionDenied => SensorError::AccessDenied(origin),
                _ => SensorError::Io(format!("{}: {}", origin, e)),
            }
        })
}
