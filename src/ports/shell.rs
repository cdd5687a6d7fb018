//! Command executor port for running external commands.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::time::Duration;

use crate::error::ExecError;

/// Boxed future type alias used by [`CommandExecutor`] to keep the trait dyn-compatible.
pub type ShellFuture<'a> = Pin<Box<dyn Future<Output = Result<ShellOutput, ExecError>> + Send + 'a>>;

/// The output of a command that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOutput {
    /// The exit code of the process (`-1` when killed by a signal).
    pub exit_code: i32,
    /// The captured standard output.
    pub stdout: String,
    /// The captured standard error.
    pub stderr: String,
}

/// Runs shell commands synchronously from the caller's point of view.
pub trait CommandExecutor: Send + Sync {
    /// Runs `command` through the system shell in `working_dir`.
    ///
    /// A non-zero exit code is not an error at this level; callers decide.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::CommandTimeout`] when `timeout` elapses (the
    /// process is killed) and [`ExecError::CommandFailed`] when it cannot
    /// be spawned.
    fn run<'a>(
        &'a self,
        command: &'a str,
        working_dir: &'a Path,
        timeout: Duration,
    ) -> ShellFuture<'a>;
}
