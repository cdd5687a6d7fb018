//! Lifecycle for command-line tools.

use crate::error::LifecycleError;
use crate::evaluate::evaluate_command;
use crate::report::RunResult;

use super::{record_outcome, Base};

/// Drives a CLI tool: nothing to launch, tests run commands.
pub struct CliAdapter<'a> {
    pub(super) base: Base<'a>,
}

impl<'a> CliAdapter<'a> {
    pub(super) fn new(base: Base<'a>) -> Self {
        Self { base }
    }

    /// Runs `lifecycle.verify`, if configured.
    pub(super) async fn wait_for_ready(&self) -> Result<(), LifecycleError> {
        match self.base.spec.lifecycle.verify.as_deref() {
            Some(command) => self.base.run_step("Verify", command).await.map(|_| ()),
            None => Ok(()),
        }
    }

    pub(super) async fn run_tests(&self, result: &mut RunResult) {
        let Base { spec, ctx, workspace, .. } = &self.base;
        for test in &spec.tests {
            let outcome = evaluate_command(
                ctx.shell.as_ref(),
                test,
                &workspace.output_dir,
                &workspace.challenge_dir,
            )
            .await;
            record_outcome(result, outcome);
        }
    }
}
