//! Per-test outcome records.

use serde::{Deserialize, Serialize};

/// Why a test was skipped rather than executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The test is marked `optional` in the spec.
    Optional,
    /// No HTTP client is available in this environment.
    HttpClientUnavailable,
}

/// Coarse status used for counting and printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// Every check passed.
    Passed,
    /// A check failed; `error` holds the reason.
    Failed,
    /// Not executed.
    Skipped,
}

/// The recorded result of one declared test.
///
/// Exactly one of passed, skipped, or failed-with-error holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestOutcome {
    /// Test name from the spec.
    pub name: String,
    /// All checks passed.
    pub passed: bool,
    /// The test was not executed.
    pub skipped: bool,
    /// Failure reason; `None` unless the test failed.
    pub error: Option<String>,
    /// Why the test was skipped, when it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<SkipReason>,
}

impl TestOutcome {
    /// A passing outcome.
    #[must_use]
    pub fn passed(name: impl Into<String>) -> Self {
        Self { name: name.into(), passed: true, skipped: false, error: None, skip_reason: None }
    }

    /// A failing outcome with a human-readable reason.
    #[must_use]
    pub fn failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            skipped: false,
            error: Some(reason.into()),
            skip_reason: None,
        }
    }

    /// A skipped outcome.
    #[must_use]
    pub fn skipped(name: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            name: name.into(),
            passed: false,
            skipped: true,
            error: None,
            skip_reason: Some(reason),
        }
    }

    /// Collapses the flags into one status.
    #[must_use]
    pub fn status(&self) -> OutcomeStatus {
        if self.passed {
            OutcomeStatus::Passed
        } else if self.skipped {
            OutcomeStatus::Skipped
        } else {
            OutcomeStatus::Failed
        }
    }

    /// Renders the marker line(s) printed while tests run.
    #[must_use]
    pub fn render(&self) -> String {
        match self.status() {
            OutcomeStatus::Passed => format!("  ✓ {}", self.name),
            OutcomeStatus::Skipped => format!("  ⊘ {} (skipped)", self.name),
            OutcomeStatus::Failed => match &self.error {
                Some(error) => format!("  ✗ {}\n    {error}", self.name),
                None => format!("  ✗ {}", self.name),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_keep_flags_exclusive() {
        let pass = TestOutcome::passed("a");
        let fail = TestOutcome::failed("b", "Exit code 2, expected 0");
        let skip = TestOutcome::skipped("c", SkipReason::Optional);

        assert_eq!(pass.status(), OutcomeStatus::Passed);
        assert_eq!(fail.status(), OutcomeStatus::Failed);
        assert_eq!(skip.status(), OutcomeStatus::Skipped);
        assert!(!skip.passed && skip.error.is_none());
        assert!(!fail.passed && !fail.skipped);
    }

    #[test]
    fn renders_markers() {
        assert_eq!(TestOutcome::passed("greets").render(), "  ✓ greets");
        assert_eq!(
            TestOutcome::skipped("metrics", SkipReason::Optional).render(),
            "  ⊘ metrics (skipped)"
        );
        assert_eq!(
            TestOutcome::failed("exits", "Exit code 2, expected 0").render(),
            "  ✗ exits\n    Exit code 2, expected 0"
        );
    }

    #[test]
    fn serializes_report_shape() {
        let json = serde_json::to_value(TestOutcome::passed("greets")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "greets", "passed": true, "skipped": false, "error": null})
        );

        let json =
            serde_json::to_value(TestOutcome::skipped("x", SkipReason::HttpClientUnavailable))
                .unwrap();
        assert_eq!(json["skip_reason"], "http_client_unavailable");
    }
}
