//! Core library entry for the `vouch` CLI.
//!
//! `vouch` takes a built artifact plus a declarative runtime spec, brings
//! the artifact up (a CLI tool or a long-running HTTP service), runs the
//! spec's tests against it, and reports a verdict. Cleanup always runs.

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod context;
pub mod error;
pub mod evaluate;
pub mod lifecycle;
pub mod ports;
pub mod process;
pub mod readiness;
pub mod report;
pub mod spec;
pub mod verify;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        // --help and --version
        Err(err) if !err.use_stderr() => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli.command)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_on_missing_spec() {
        let result = run(["vouch", "validate", "--spec", "/nonexistent/runtime.yaml"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["vouch", "unknown"]);
        assert!(result.is_err());
    }
}
