//! Verification orchestrator.
//!
//! Drives one adapter through
//! `SETUP → (START → WAIT_READY) → RUN_TESTS → (MEASURE_PERFORMANCE) → CLEANUP`.
//! The first lifecycle error skips every remaining pre-cleanup phase and is
//! recorded as the run's top-level error. Cleanup runs exactly once on every
//! path out of the phases.

use std::time::Instant;

use tracing::{error, info};

use crate::context::ServiceContext;
use crate::error::LifecycleError;
use crate::lifecycle::{Adapter, LifecycleSettings, Workspace};
use crate::report::RunResult;
use crate::spec::VerificationSpec;

/// Runs one spec against one artifact.
pub struct Verifier<'a> {
    spec: &'a VerificationSpec,
    ctx: &'a ServiceContext,
    workspace: Workspace,
    settings: LifecycleSettings,
}

impl<'a> Verifier<'a> {
    /// Creates a verifier with default lifecycle timings.
    #[must_use]
    pub fn new(spec: &'a VerificationSpec, ctx: &'a ServiceContext, workspace: Workspace) -> Self {
        Self { spec, ctx, workspace, settings: LifecycleSettings::default() }
    }

    /// Overrides lifecycle timings (shutdown grace, readiness polling).
    #[must_use]
    pub fn with_settings(mut self, settings: LifecycleSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Runs the full lifecycle and returns the collected result.
    ///
    /// Never fails: lifecycle errors end up in [`RunResult::error`].
    pub async fn run(&self) -> RunResult {
        let timer = Instant::now();
        let mut result = RunResult::new(
            self.workspace.challenge_dir.display().to_string(),
            self.spec.adapter,
            self.ctx.clock.now(),
        );

        println!("Adapter type: {}", self.spec.adapter);
        println!();

        let mut adapter = Adapter::for_spec(self.spec, self.ctx, &self.workspace, self.settings);
        info!(
            adapter = %adapter.kind(),
            output = %self.workspace.output_dir.display(),
            http = self.ctx.has_http(),
            "verification started"
        );

        if let Err(e) = self.drive(&mut adapter, &mut result).await {
            error!(error = %e, "lifecycle aborted");
            println!("\n✗ ERROR: {e}");
            result.error = Some(e.to_string());
        }

        println!("\n=== Cleanup ===");
        adapter.cleanup().await;

        result.duration_ms = u64::try_from(timer.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            passed = result.passed(),
            failed = result.failed(),
            skipped = result.skipped(),
            duration_ms = result.duration_ms,
            "verification finished"
        );
        result
    }

    async fn drive(&self, adapter: &mut Adapter<'_>, result: &mut RunResult) -> Result<(), LifecycleError> {
        println!("=== Setup ===");
        adapter.setup().await?;
        println!("✓ Setup complete\n");

        if adapter.launches_process() {
            println!("=== Starting Application ===");
            adapter.start().await?;
            println!("✓ Application started\n");
        }

        println!("=== Waiting for Ready ===");
        adapter.wait_for_ready().await?;
        println!("✓ Application ready\n");

        println!("=== Running Tests ===");
        adapter.run_tests(result).await?;

        if self.spec.performance.is_some() {
            println!("\n=== Performance Benchmarks ===");
            adapter.measure_performance();
        }
        Ok(())
    }
}
