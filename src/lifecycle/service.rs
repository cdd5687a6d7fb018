//! Lifecycle for long-running HTTP services (web apps and APIs).

use regex::Regex;
use tracing::{info, warn};

use crate::error::{LifecycleError, ReadinessError};
use crate::evaluate::{evaluate_http, SkipReason, TestOutcome};
use crate::process::ManagedProcess;
use crate::readiness::wait_for_ready;
use crate::report::RunResult;
use crate::spec::{AdapterKind, Endpoint};

use super::{record_outcome, Base, LifecycleSettings};

/// Drives a service: launch, wait for the ready banner, test over HTTP.
///
/// Owns at most one [`ManagedProcess`]; only [`ServiceAdapter::cleanup`]
/// stops it.
pub struct ServiceAdapter<'a> {
    pub(super) base: Base<'a>,
    kind: AdapterKind,
    settings: LifecycleSettings,
    process: Option<ManagedProcess>,
}

impl<'a> ServiceAdapter<'a> {
    pub(super) fn new(base: Base<'a>, kind: AdapterKind, settings: LifecycleSettings) -> Self {
        Self { base, kind, settings, process: None }
    }

    pub(super) fn kind(&self) -> AdapterKind {
        self.kind
    }

    fn endpoint(&self) -> Result<&'a Endpoint, LifecycleError> {
        self.base.spec.endpoint.as_ref().ok_or(LifecycleError::MissingEndpoint(self.kind.as_str()))
    }

    /// Launches `lifecycle.start` in the output directory.
    pub(super) fn start(&mut self) -> Result<(), LifecycleError> {
        if self.process.is_some() {
            return Ok(());
        }
        let command = self
            .base
            .spec
            .lifecycle
            .start
            .as_deref()
            .ok_or(LifecycleError::MissingStartCommand(self.kind.as_str()))?;

        println!("  Running: {command}");
        let cwd = &self.base.workspace.output_dir;
        let process = ManagedProcess::spawn(command, cwd).map_err(|source| {
            LifecycleError::LaunchFailed { command: command.to_string(), cwd: cwd.clone(), source }
        })?;
        self.process = Some(process);
        Ok(())
    }

    pub(super) async fn wait_for_ready(&mut self) -> Result<(), LifecycleError> {
        let endpoint = self.endpoint()?;
        let pattern = Regex::new(&endpoint.ready_pattern).map_err(|source| {
            LifecycleError::InvalidReadyPattern { pattern: endpoint.ready_pattern.clone(), source }
        })?;
        let timeout = endpoint.startup_timeout();

        println!("  Waiting for pattern: {}", endpoint.ready_pattern);
        println!("  Timeout: {}s", timeout.as_secs_f64());

        let process = self.process.as_mut().ok_or(ReadinessError::ProcessDiedDuringStartup(None))?;
        let line = wait_for_ready(process, &pattern, timeout, self.settings.readiness).await?;
        println!("  ✓ Found: {}", line.trim());
        Ok(())
    }

    pub(super) async fn run_tests(&self, result: &mut RunResult) -> Result<(), LifecycleError> {
        let endpoint = self.endpoint()?;
        let Base { spec, ctx, workspace, .. } = &self.base;

        let Some(http) = ctx.http.as_deref() else {
            warn!("no HTTP client available; skipping HTTP tests");
            println!("  Skipping HTTP tests (HTTP client unavailable)");
            for test in &spec.tests {
                record_outcome(result, TestOutcome::skipped(&test.name, SkipReason::HttpClientUnavailable));
            }
            return Ok(());
        };

        for test in &spec.tests {
            let outcome = evaluate_http(http, &endpoint.url, test, &workspace.challenge_dir).await;
            record_outcome(result, outcome);
        }
        Ok(())
    }

    /// Two-phase stop of the service, then the cleanup command.
    pub(super) async fn cleanup(&mut self) {
        if let Some(mut process) = self.process.take() {
            println!("Stopping application...");
            let status = process.shutdown(self.settings.shutdown_grace).await;
            info!(pid = process.pid(), command = process.command(), ?status, "service stopped");
        }
        self.base.cleanup_command().await;
    }
}
