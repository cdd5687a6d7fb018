//! `vouch run` command.

use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::context::ServiceContext;
use crate::lifecycle::Workspace;
use crate::report::{format_summary, write_report, Verdict};
use crate::spec::VerificationSpec;
use crate::verify::Verifier;

/// Execute the `run` command.
///
/// Loads the spec, drives the lifecycle, writes the JSON report, and
/// prints the summary. The verdict decides the outcome: anything other
/// than a pass is returned as an error so the process exits non-zero.
///
/// # Errors
///
/// Returns an error string if the spec cannot be loaded, the report cannot
/// be written, or the run did not pass.
pub fn run(args: &RunArgs) -> Result<(), String> {
    let spec = VerificationSpec::load(&args.spec)?;
    for problem in spec.problems() {
        warn!(%problem, "spec problem");
    }

    let workspace = Workspace { output_dir: args.output.clone(), challenge_dir: args.challenge_dir.clone() };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;

    let result = runtime.block_on(async {
        let ctx = ServiceContext::live();
        Verifier::new(&spec, &ctx, workspace).run().await
    });

    write_report(&args.report, &result)?;
    info!(path = %args.report.display(), "report written");

    println!("{}", format_summary(&result));

    match result.verdict() {
        Verdict::Passed => Ok(()),
        Verdict::Failed => Err("Runtime verification failed".to_string()),
        Verdict::NoTestsRan => Err("No tests were run".to_string()),
    }
}
