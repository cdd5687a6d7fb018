//! `vouch validate` command.

use std::path::Path;

use crate::spec::VerificationSpec;

/// Execute the `validate` command.
///
/// # Errors
///
/// Returns an error string if the spec cannot be loaded or has problems.
pub fn run(spec_path: &Path) -> Result<(), String> {
    let spec = VerificationSpec::load(spec_path)?;
    let problems = spec.problems();
    if problems.is_empty() {
        println!(
            "{}: ok ({} adapter, {} test{})",
            spec_path.display(),
            spec.adapter,
            spec.tests.len(),
            if spec.tests.len() == 1 { "" } else { "s" }
        );
        return Ok(());
    }

    for problem in &problems {
        println!("  - {problem}");
    }
    Err(format!("{}: {} problem(s) found", spec_path.display(), problems.len()))
}
