//! Artifact lifecycles.
//!
//! An [`Adapter`] knows how to bring one kind of artifact up, probe it,
//! test it, and tear it down. The set of kinds is closed: command-line
//! tools use [`CliAdapter`], web apps and APIs share [`ServiceAdapter`]
//! (the kind is kept only as a label).

mod cli;
mod service;

use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

pub use cli::CliAdapter;
pub use service::ServiceAdapter;

use crate::context::ServiceContext;
use crate::error::LifecycleError;
use crate::ports::shell::ShellOutput;
use crate::readiness::ReadinessTiming;
use crate::report::RunResult;
use crate::spec::{AdapterKind, VerificationSpec};

/// Lines of stderr kept in a step failure message.
const STDERR_TAIL_LINES: usize = 10;

/// Directories a run works in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// The artifact under test; working directory for every command.
    pub output_dir: PathBuf,
    /// Challenge root; golden file paths resolve against it.
    pub challenge_dir: PathBuf,
}

/// Timing knobs for the service lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleSettings {
    /// How long a service gets to exit after `SIGTERM` before it is killed.
    pub shutdown_grace: Duration,
    /// Readiness poll cadence and settle delay.
    pub readiness: ReadinessTiming,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self { shutdown_grace: Duration::from_secs(10), readiness: ReadinessTiming::default() }
    }
}

/// State shared by every adapter: the spec, the ports, and the workspace.
struct Base<'a> {
    spec: &'a VerificationSpec,
    ctx: &'a ServiceContext,
    workspace: &'a Workspace,
    cleaned_up: bool,
}

impl<'a> Base<'a> {
    fn new(spec: &'a VerificationSpec, ctx: &'a ServiceContext, workspace: &'a Workspace) -> Self {
        Self { spec, ctx, workspace, cleaned_up: false }
    }

    /// Runs a lifecycle step, treating a non-zero exit as failure.
    async fn run_step(&self, label: &'static str, command: &str) -> Result<ShellOutput, LifecycleError> {
        info!(label, command, "running lifecycle step");
        let output = self
            .ctx
            .shell
            .run(command, &self.workspace.output_dir, self.spec.lifecycle.step_timeout())
            .await
            .map_err(|source| LifecycleError::StepExec { label, source })?;

        if output.exit_code != 0 {
            return Err(LifecycleError::StepFailed {
                label,
                command: command.to_string(),
                code: output.exit_code,
                stderr: stderr_tail(&output.stderr),
            });
        }
        Ok(output)
    }

    async fn setup(&self) -> Result<(), LifecycleError> {
        if !self.workspace.output_dir.is_dir() {
            return Err(LifecycleError::OutputDirMissing(self.workspace.output_dir.clone()));
        }
        self.run_step("Setup", &self.spec.lifecycle.setup).await.map(|_| ())
    }

    /// Runs the configured cleanup command at most once. Never fails.
    async fn cleanup_command(&mut self) {
        if std::mem::replace(&mut self.cleaned_up, true) {
            return;
        }
        let Some(command) = self.spec.lifecycle.cleanup.as_deref() else {
            return;
        };
        if let Err(e) = self.run_step("Cleanup", command).await {
            warn!(error = %e, "cleanup failed");
            println!("  Cleanup failed (ignored): {e}");
        }
    }
}

fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.trim().lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

/// One artifact lifecycle, selected by the spec's adapter kind.
pub enum Adapter<'a> {
    /// Command-line tool.
    Cli(CliAdapter<'a>),
    /// Long-running web app or API.
    Service(ServiceAdapter<'a>),
}

impl<'a> Adapter<'a> {
    /// Picks the adapter for `spec.adapter`.
    #[must_use]
    pub fn for_spec(
        spec: &'a VerificationSpec,
        ctx: &'a ServiceContext,
        workspace: &'a Workspace,
        settings: LifecycleSettings,
    ) -> Self {
        let base = Base::new(spec, ctx, workspace);
        match spec.adapter {
            AdapterKind::Cli => Self::Cli(CliAdapter::new(base)),
            kind @ (AdapterKind::Webapp | AdapterKind::Api) => {
                Self::Service(ServiceAdapter::new(base, kind, settings))
            }
        }
    }

    /// The adapter kind this lifecycle was selected for.
    #[must_use]
    pub fn kind(&self) -> AdapterKind {
        match self {
            Self::Cli(_) => AdapterKind::Cli,
            Self::Service(adapter) => adapter.kind(),
        }
    }

    /// Returns `true` if this lifecycle launches a long-running process.
    #[must_use]
    pub fn launches_process(&self) -> bool {
        matches!(self, Self::Service(_))
    }

    /// Runs `lifecycle.setup`.
    ///
    /// # Errors
    ///
    /// Fails when the output directory is missing, or the setup command
    /// cannot run or exits non-zero.
    pub async fn setup(&mut self) -> Result<(), LifecycleError> {
        match self {
            Self::Cli(adapter) => adapter.base.setup().await,
            Self::Service(adapter) => adapter.base.setup().await,
        }
    }

    /// Launches the artifact. A no-op for CLI tools.
    ///
    /// # Errors
    ///
    /// Fails when a service has no start command or cannot be spawned.
    pub async fn start(&mut self) -> Result<(), LifecycleError> {
        match self {
            Self::Cli(_) => Ok(()),
            Self::Service(adapter) => adapter.start(),
        }
    }

    /// Waits until the artifact can be tested.
    ///
    /// # Errors
    ///
    /// Fails when the CLI verify step fails, or the service dies or never
    /// prints its ready pattern.
    pub async fn wait_for_ready(&mut self) -> Result<(), LifecycleError> {
        match self {
            Self::Cli(adapter) => adapter.wait_for_ready().await,
            Self::Service(adapter) => adapter.wait_for_ready().await,
        }
    }

    /// Evaluates every declared test in order, recording each outcome.
    ///
    /// # Errors
    ///
    /// Only fails when a service has no endpoint to test against.
    pub async fn run_tests(&mut self, result: &mut RunResult) -> Result<(), LifecycleError> {
        match self {
            Self::Cli(adapter) => {
                adapter.run_tests(result).await;
                Ok(())
            }
            Self::Service(adapter) => adapter.run_tests(result).await,
        }
    }

    /// Performance benchmarking hook. Currently inert.
    pub fn measure_performance(&self) {
        match self {
            Self::Cli(_) => println!("  (Performance benchmarking not yet implemented for CLI)"),
            Self::Service(_) => println!("  (Performance benchmarking not yet implemented)"),
        }
    }

    /// Stops anything started and runs `lifecycle.cleanup`. Never fails.
    pub async fn cleanup(&mut self) {
        match self {
            Self::Cli(adapter) => adapter.base.cleanup_command().await,
            Self::Service(adapter) => adapter.cleanup().await,
        }
    }
}

/// Prints one outcome's marker line and records it.
fn record_outcome(result: &mut RunResult, outcome: crate::evaluate::TestOutcome) {
    println!("{}", outcome.render());
    result.record(outcome);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::clock::SystemClock;
    use crate::adapters::live::shell::LiveCommandExecutor;

    #[test]
    fn stderr_tail_keeps_last_lines() {
        let stderr: String = (1..=15).map(|i| format!("line {i}\n")).collect();
        let tail = stderr_tail(&stderr);
        assert!(tail.starts_with("line 6"));
        assert!(tail.ends_with("line 15"));
        assert_eq!(stderr_tail("  \n"), "");
    }

    #[test]
    fn default_settings_match_documented_timings() {
        let settings = LifecycleSettings::default();
        assert_eq!(settings.shutdown_grace, Duration::from_secs(10));
        assert_eq!(settings.readiness.poll_interval, Duration::from_millis(500));
        assert_eq!(settings.readiness.settle_delay, Duration::from_secs(2));
    }

    #[test]
    fn selects_adapter_by_kind() {
        let ctx = ServiceContext {
            clock: Box::new(SystemClock),
            shell: Box::new(LiveCommandExecutor),
            http: None,
        };
        let workspace = Workspace {
            output_dir: std::env::temp_dir(),
            challenge_dir: std::env::temp_dir(),
        };
        for (yaml, kind, launches) in [
            ("adapter: cli\nlifecycle: { setup: 'true' }\n", AdapterKind::Cli, false),
            ("adapter: webapp\nlifecycle: { setup: 'true' }\n", AdapterKind::Webapp, true),
            ("adapter: api\nlifecycle: { setup: 'true' }\n", AdapterKind::Api, true),
        ] {
            let spec = VerificationSpec::from_yaml(yaml).unwrap();
            let adapter = Adapter::for_spec(&spec, &ctx, &workspace, LifecycleSettings::default());
            assert_eq!(adapter.kind(), kind);
            assert_eq!(adapter.launches_process(), launches);
        }
    }
}
