//! Error types for the verification lifecycle.
//!
//! Test-level problems never show up here: they are turned into a
//! [`TestOutcome`](crate::evaluate::TestOutcome) with a reason string.
//! These types cover the port boundaries and the lifecycle-level failures
//! that abort a run and send it straight to cleanup.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failure to run an external command to completion.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The command did not finish within its timeout and was killed.
    #[error("Command `{command}` timed out after {}s", .timeout.as_secs_f64())]
    CommandTimeout {
        /// The shell command line.
        command: String,
        /// The bound that elapsed.
        timeout: Duration,
    },

    /// The command could not be spawned or its output could not be collected.
    #[error("Command `{command}` could not be run: {source}")]
    CommandFailed {
        /// The shell command line.
        command: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Failure to complete one HTTP exchange.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The request (or reading its body) exceeded the per-test timeout.
    #[error("Request timeout after {}s", .0.as_secs_f64())]
    RequestTimeout(Duration),

    /// Transport-level failure, with the underlying cause rendered.
    #[error("Request failed: {0}")]
    RequestFailed(String),
}

/// Why a launched service never became ready.
#[derive(Debug, Error)]
pub enum ReadinessError {
    /// The process exited before printing a line matching the ready pattern.
    #[error("Application process died during startup{}", exit_suffix(.0))]
    ProcessDiedDuringStartup(Option<i32>),

    /// No matching line appeared within the startup timeout.
    #[error("Application didn't start within {}s", .0.as_secs_f64())]
    ReadinessTimeout(Duration),
}

fn exit_suffix(code: &Option<i32>) -> String {
    code.map(|c| format!(" (exit code {c})")).unwrap_or_default()
}

/// A failure that aborts the remaining lifecycle phases.
///
/// Recorded as the run's top-level error; never counted against a test.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// A setup/verify/cleanup step exited non-zero.
    #[error("{label} command `{command}` exited with code {code}{}", stderr_suffix(.stderr))]
    StepFailed {
        /// Phase label (e.g. `Setup`).
        label: &'static str,
        /// The shell command line.
        command: String,
        /// The observed exit code.
        code: i32,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// A lifecycle step could not be executed at all.
    #[error("{label} step failed: {source}")]
    StepExec {
        /// Phase label.
        label: &'static str,
        /// Underlying executor error.
        #[source]
        source: ExecError,
    },

    /// The artifact directory does not exist, so no command can run in it.
    #[error("Output directory not found: {}", .0.display())]
    OutputDirMissing(PathBuf),

    /// A service adapter was configured without `lifecycle.start`.
    #[error("Adapter `{0}` requires lifecycle.start")]
    MissingStartCommand(&'static str),

    /// A service adapter was configured without an `endpoint` section.
    #[error("Adapter `{0}` requires an endpoint section")]
    MissingEndpoint(&'static str),

    /// The endpoint's ready pattern is not a valid regular expression.
    #[error("Invalid ready pattern `{pattern}`: {source}")]
    InvalidReadyPattern {
        /// The pattern as written in the spec.
        pattern: String,
        /// Regex compile error.
        #[source]
        source: regex::Error,
    },

    /// The long-running service process could not be spawned.
    #[error("Failed to launch `{command}` in {}: {source}", .cwd.display())]
    LaunchFailed {
        /// The start command.
        command: String,
        /// Working directory it was launched in.
        cwd: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The service died or timed out while waiting for readiness.
    #[error("{0}")]
    ApplicationStartupFailed(#[from] ReadinessError),
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}
