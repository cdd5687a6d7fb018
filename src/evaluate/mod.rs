//! Evaluating declared test cases.
//!
//! Two execution strategies share one result contract, [`TestOutcome`]:
//! command mode runs a shell command, HTTP mode calls the service. Checks
//! run in a fixed order (exit code or status, then substrings, then golden
//! JSON) and the first failing check decides the reason. Nothing is retried.

mod command;
mod http;
mod json;
mod outcome;

pub use command::evaluate_command;
pub use http::evaluate_http;
pub use json::{check_golden, json_equal, JsonSubject};
pub use outcome::{OutcomeStatus, SkipReason, TestOutcome};

/// Returns the first needle not found in `haystack`.
fn first_missing<'a>(haystack: &str, needles: &'a [String]) -> Option<&'a str> {
    needles.iter().map(String::as_str).find(|needle| !haystack.contains(needle))
}
