//! Top-level runtime spec type.

use std::path::Path;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::adapter_kind::AdapterKind;
use super::{is_valid_seconds, seconds};
use super::test_case::TestCase;

const DEFAULT_STEP_TIMEOUT_SECS: u64 = 600;
const DEFAULT_STARTUP_TIMEOUT_SECS: u64 = 60;

/// Shell commands that bring the artifact up and tear it down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lifecycle {
    /// Prepares the artifact (install, build). Always runs.
    pub setup: String,
    /// Launches the long-running service (service adapters).
    #[serde(default)]
    pub start: Option<String>,
    /// Smoke-checks a CLI tool before its tests run.
    #[serde(default)]
    pub verify: Option<String>,
    /// Best-effort teardown; failures are logged, never fatal.
    #[serde(default)]
    pub cleanup: Option<String>,
    /// Bound in seconds for each setup/verify/cleanup step.
    #[serde(default)]
    pub timeout: Option<f64>,
}

impl Lifecycle {
    /// Timeout applied to setup, verify, and cleanup steps (default 600s).
    #[must_use]
    pub fn step_timeout(&self) -> Duration {
        seconds(self.timeout, DEFAULT_STEP_TIMEOUT_SECS)
    }
}

/// Where a service listens and how to tell it is up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Base URL that test paths are appended to.
    pub url: String,
    /// Regular expression matched against each startup output line.
    pub ready_pattern: String,
    /// Seconds to wait for the ready pattern; fractions allowed.
    #[serde(default)]
    pub startup_timeout: Option<f64>,
}

impl Endpoint {
    /// Startup timeout (default 60s).
    #[must_use]
    pub fn startup_timeout(&self) -> Duration {
        seconds(self.startup_timeout, DEFAULT_STARTUP_TIMEOUT_SECS)
    }
}

/// A decoded `runtime-spec.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationSpec {
    /// Which lifecycle drives the artifact.
    pub adapter: AdapterKind,
    /// Lifecycle commands.
    pub lifecycle: Lifecycle,
    /// Service endpoint (service adapters only).
    #[serde(default)]
    pub endpoint: Option<Endpoint>,
    /// Tests, executed in declaration order.
    #[serde(default)]
    pub tests: Vec<TestCase>,
    /// Performance section. Its presence enables the benchmark phase.
    #[serde(default)]
    pub performance: Option<serde_yaml::Value>,
}

impl VerificationSpec {
    /// Loads and decodes a spec file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not match the schema.
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read spec file {}: {e}", path.display()))?;
        Self::from_yaml(&contents)
            .map_err(|e| format!("Failed to parse spec file {}: {e}", path.display()))
    }

    /// Decodes a spec from YAML text.
    ///
    /// # Errors
    ///
    /// Returns the YAML error when the document does not match the schema.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Lists structural problems that would make a run fail before testing.
    ///
    /// An empty list means the spec is usable by its adapter.
    #[must_use]
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let kind = self.adapter;

        if kind.is_service() {
            if self.lifecycle.start.is_none() {
                problems.push(format!("adapter `{kind}` requires lifecycle.start"));
            }
            match &self.endpoint {
                None => problems.push(format!("adapter `{kind}` requires an endpoint section")),
                Some(endpoint) => {
                    if let Err(e) = Regex::new(&endpoint.ready_pattern) {
                        problems.push(format!(
                            "endpoint.ready_pattern `{}` is not a valid regex: {e}",
                            endpoint.ready_pattern
                        ));
                    }
                }
            }
        } else {
            for (i, test) in self.tests.iter().enumerate() {
                if test.command.is_none() {
                    problems.push(format!("tests[{i}] `{}` has no command", test.name));
                }
            }
        }

        if self.tests.is_empty() {
            problems.push("no tests declared".to_string());
        }

        let mut timeouts = vec![("lifecycle.timeout".to_string(), self.lifecycle.timeout)];
        if let Some(endpoint) = &self.endpoint {
            timeouts.push(("endpoint.startup_timeout".to_string(), endpoint.startup_timeout));
        }
        for (i, test) in self.tests.iter().enumerate() {
            timeouts.push((format!("tests[{i}].timeout"), test.timeout));
        }
        for (field, value) in timeouts {
            if let Some(secs) = value.filter(|secs| !is_valid_seconds(*secs)) {
                problems.push(format!("{field} must be a non-negative number of seconds, got {secs}"));
            }
        }

        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLI_SPEC: &str = r#"
adapter: cli
lifecycle:
  setup: "pip install -e ."
  verify: "mytool --help"
tests:
  - name: greets
    command: "echo hello"
    expect_stdout_contains: ["hello"]
"#;

    const SERVICE_SPEC: &str = r#"
adapter: api
lifecycle:
  setup: "npm ci"
  start: "npm start"
  cleanup: "rm -rf tmp"
endpoint:
  url: "http://127.0.0.1:3000"
  ready_pattern: "listening on \\d+"
  startup_timeout: 5
tests:
  - name: list products
    path: /api/products
    expect_json_file: golden/products.json
  - name: metrics
    path: /metrics
    optional: true
performance:
  p95_ms: 200
"#;

    #[test]
    fn decodes_cli_spec() {
        let spec = VerificationSpec::from_yaml(CLI_SPEC).unwrap();
        assert_eq!(spec.adapter, AdapterKind::Cli);
        assert_eq!(spec.lifecycle.verify.as_deref(), Some("mytool --help"));
        assert_eq!(spec.lifecycle.step_timeout(), Duration::from_secs(600));
        assert!(spec.endpoint.is_none());
        assert!(spec.performance.is_none());
        assert_eq!(spec.tests.len(), 1);
        assert!(spec.problems().is_empty());
    }

    #[test]
    fn decodes_service_spec() {
        let spec = VerificationSpec::from_yaml(SERVICE_SPEC).unwrap();
        assert_eq!(spec.adapter, AdapterKind::Api);
        let endpoint = spec.endpoint.as_ref().unwrap();
        assert_eq!(endpoint.startup_timeout(), Duration::from_secs(5));
        assert_eq!(spec.tests[0].expect_json_file.as_deref(), Some("golden/products.json"));
        assert!(spec.tests[1].optional);
        assert!(spec.performance.is_some());
        assert!(spec.problems().is_empty());
    }

    #[test]
    fn rejects_unknown_adapter() {
        let yaml = "adapter: desktop\nlifecycle:\n  setup: make\n";
        assert!(VerificationSpec::from_yaml(yaml).is_err());
    }

    #[test]
    fn service_without_start_or_endpoint_has_problems() {
        let yaml = "adapter: webapp\nlifecycle:\n  setup: make\ntests:\n  - name: home\n";
        let spec = VerificationSpec::from_yaml(yaml).unwrap();
        let problems = spec.problems();
        assert!(problems.iter().any(|p| p.contains("lifecycle.start")));
        assert!(problems.iter().any(|p| p.contains("endpoint")));
    }

    #[test]
    fn invalid_ready_pattern_is_a_problem() {
        let yaml = r#"
adapter: webapp
lifecycle: { setup: make, start: "./serve" }
endpoint: { url: "http://localhost:8080", ready_pattern: "([" }
tests: [{ name: home }]
"#;
        let spec = VerificationSpec::from_yaml(yaml).unwrap();
        assert_eq!(spec.problems().len(), 1);
        assert!(spec.problems()[0].contains("not a valid regex"));
    }

    #[test]
    fn cli_test_without_command_is_a_problem() {
        let yaml = "adapter: cli\nlifecycle:\n  setup: make\ntests:\n  - name: nothing\n";
        let spec = VerificationSpec::from_yaml(yaml).unwrap();
        assert_eq!(spec.problems(), vec!["tests[0] `nothing` has no command".to_string()]);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = VerificationSpec::load(Path::new("/nonexistent/runtime-spec.yaml")).unwrap_err();
        assert!(err.starts_with("Failed to read spec file"));
    }

    #[test]
    fn fractional_timeouts_decode() {
        let yaml = r#"
adapter: webapp
lifecycle: { setup: make, start: "./serve", timeout: 90.5 }
endpoint: { url: "http://localhost:8080", ready_pattern: "ready", startup_timeout: 2.5 }
tests: [{ name: home, timeout: 0.25 }]
"#;
        let spec = VerificationSpec::from_yaml(yaml).unwrap();
        assert_eq!(spec.lifecycle.step_timeout(), Duration::from_millis(90_500));
        assert_eq!(spec.endpoint.as_ref().unwrap().startup_timeout(), Duration::from_millis(2500));
        assert_eq!(spec.tests[0].http_timeout(), Duration::from_millis(250));
        assert!(spec.problems().is_empty());
    }

    #[test]
    fn negative_timeouts_are_problems() {
        let yaml = r#"
adapter: cli
lifecycle: { setup: make, timeout: -1 }
tests: [{ name: a, command: "true", timeout: -0.5 }]
"#;
        let spec = VerificationSpec::from_yaml(yaml).unwrap();
        assert_eq!(
            spec.problems(),
            vec![
                "lifecycle.timeout must be a non-negative number of seconds, got -1".to_string(),
                "tests[0].timeout must be a non-negative number of seconds, got -0.5".to_string(),
            ]
        );
        assert_eq!(spec.lifecycle.step_timeout(), Duration::from_secs(600));
    }
}
