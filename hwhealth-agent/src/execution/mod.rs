//! External command execution for sensor sources
//!
//! Handles bounded execution of diagnostic tools (e.g. `smartctl`):
//! - Spawn with stdout captured, stdin/stderr detached
//! - Hard time limit, the child is killed when it expires
//! - Typed failures instead of panics or raw `io::Error`s
//!
//! The [`CommandRunner`] trait is the seam used by the sensor reader so that
//! tests can script tool behavior without the real binary installed.

use process_control::{ChildExt, Control};
use std::io;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

/// Captured result of a command that ran to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: Option<i64>,
    pub stdout: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Reasons a command produced no output at all
#[derive(Debug, Error)]
pub enum RunError {
    #[error("executable not found: {0}")]
    NotFound(String),
    #[error("permission denied running {0}")]
    PermissionDenied(String),
    #[error("timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Capability to run an external program with a time limit
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[String], timeout: Duration) -> Result<CommandOutput, RunError>;
}

/// Runs real processes through `process_control`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[String], timeout: Duration) -> Result<CommandOutput, RunError> {
        let start_time = Instant::now();
        debug!("Executing {} {:?} (timeout: {:?})", program, args, timeout);

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => RunError::NotFound(program.to_string()),
                io::ErrorKind::PermissionDenied => RunError::PermissionDenied(program.to_string()),
                _ => RunError::Io(e),
            })?;

        let output = child
            .controlled_with_output()
            .time_limit(timeout)
            .terminate_for_timeout()
            .wait()?
            .ok_or(RunError::Timeout(timeout))?;

        debug!("{} finished in {}ms", program, start_time.elapsed().as_millis());

        Ok(CommandOutput {
            exit_code: output.status.code().map(i64::from),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        })
    }
}
