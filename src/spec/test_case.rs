//! A single declared test case.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::seconds;

const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 30;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// One declarative check against the artifact.
///
/// CLI adapters read the command-mode fields, service adapters the
/// HTTP-mode fields. Names are used for reporting only and are not
/// required to be unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    /// Display name.
    pub name: String,

    /// Shell command to run (command mode).
    #[serde(default)]
    pub command: Option<String>,
    /// Expected process exit code.
    #[serde(default)]
    pub expect_exit_code: i32,
    /// Substrings stdout must contain, checked in order.
    #[serde(default)]
    pub expect_stdout_contains: Vec<String>,
    /// Golden JSON file stdout must equal, relative to the challenge root.
    #[serde(default)]
    pub expect_stdout_json_matches: Option<String>,

    /// HTTP method (HTTP mode).
    #[serde(default = "default_method")]
    pub method: String,
    /// Path appended to the endpoint base URL.
    #[serde(default = "default_path")]
    pub path: String,
    /// Expected HTTP status.
    #[serde(default = "default_status")]
    pub expect_status: u16,
    /// Substrings the response body must contain, checked in order.
    #[serde(default)]
    pub expect_body_contains: Vec<String>,
    /// Golden JSON file the response body must equal, relative to the challenge root.
    #[serde(default)]
    pub expect_json_file: Option<String>,

    /// Per-test timeout in seconds; fractions allowed.
    #[serde(default)]
    pub timeout: Option<f64>,
    /// Always report as skipped instead of executing.
    #[serde(default)]
    pub optional: bool,
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_path() -> String {
    "/".to_string()
}

fn default_status() -> u16 {
    200
}

impl Default for TestCase {
    fn default() -> Self {
        Self {
            name: String::new(),
            command: None,
            expect_exit_code: 0,
            expect_stdout_contains: Vec::new(),
            expect_stdout_json_matches: None,
            method: default_method(),
            path: default_path(),
            expect_status: default_status(),
            expect_body_contains: Vec::new(),
            expect_json_file: None,
            timeout: None,
            optional: false,
        }
    }
}

impl TestCase {
    /// Timeout for command-mode execution (default 30s).
    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        seconds(self.timeout, DEFAULT_COMMAND_TIMEOUT_SECS)
    }

    /// Timeout for one HTTP request (default 10s).
    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        seconds(self.timeout, DEFAULT_HTTP_TIMEOUT_SECS)
    }
}
