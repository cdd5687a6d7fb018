//! Command dispatch and handlers.

pub mod run;
pub mod validate;

use crate::cli::Command;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::Run(args) => run::run(args),
        Command::Validate { spec } => validate::run(spec),
    }
}
