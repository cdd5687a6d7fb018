//! Run results, verdicts, and the JSON report.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::evaluate::{OutcomeStatus, TestOutcome};
use crate::spec::AdapterKind;

/// Overall verdict, computed once the run is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// At least one test passed and none failed.
    Passed,
    /// A test failed or the lifecycle aborted.
    Failed,
    /// Nothing passed and nothing failed: the run verified nothing.
    NoTestsRan,
}

impl Verdict {
    /// Process exit code for this verdict.
    #[must_use]
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Passed => 0,
            Self::Failed | Self::NoTestsRan => 1,
        }
    }

    /// Final line printed under the summary.
    #[must_use]
    pub fn banner(self) -> &'static str {
        match self {
            Self::Passed => "✓ Runtime verification PASSED",
            Self::Failed => "✗ Runtime verification FAILED",
            Self::NoTestsRan => "⚠ No tests were run",
        }
    }
}

/// Everything recorded about one verification run.
///
/// Counters are only updated through [`RunResult::record`], so they always
/// agree with the outcome list.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    /// Challenge root the run was verified against.
    pub challenge: String,
    /// Adapter kind from the spec.
    pub adapter_type: AdapterKind,
    tests: Vec<TestOutcome>,
    /// Performance metrics. Empty until benchmarking exists.
    pub performance: BTreeMap<String, serde_json::Value>,
    passed: usize,
    failed: usize,
    skipped: usize,
    /// Lifecycle-level failure that aborted the run, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the run began.
    pub started_at: DateTime<Utc>,
    /// Wall time of the whole run, cleanup included.
    pub duration_ms: u64,
}

impl RunResult {
    /// Starts an empty result.
    #[must_use]
    pub fn new(challenge: impl Into<String>, adapter_type: AdapterKind, started_at: DateTime<Utc>) -> Self {
        Self {
            challenge: challenge.into(),
            adapter_type,
            tests: Vec::new(),
            performance: BTreeMap::new(),
            passed: 0,
            failed: 0,
            skipped: 0,
            error: None,
            started_at,
            duration_ms: 0,
        }
    }

    /// Appends an outcome in declaration order and bumps its counter.
    pub fn record(&mut self, outcome: TestOutcome) {
        match outcome.status() {
            OutcomeStatus::Passed => self.passed += 1,
            OutcomeStatus::Failed => self.failed += 1,
            OutcomeStatus::Skipped => self.skipped += 1,
        }
        self.tests.push(outcome);
    }

    /// Outcomes in the order they were recorded.
    #[must_use]
    pub fn tests(&self) -> &[TestOutcome] {
        &self.tests
    }

    /// Number of passed tests.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.passed
    }

    /// Number of failed tests.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Number of skipped tests.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Computes the verdict from the final counters.
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        if self.error.is_some() || self.failed > 0 {
            Verdict::Failed
        } else if self.passed == 0 {
            Verdict::NoTestsRan
        } else {
            Verdict::Passed
        }
    }
}

/// Formats the end-of-run summary block.
#[must_use]
pub fn format_summary(result: &RunResult) -> String {
    let rule = "=".repeat(50);
    let mut out = String::new();
    let _ = writeln!(out, "\n{rule}");
    let _ = writeln!(out, "Runtime Verification Results");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Passed:  {}", result.passed);
    let _ = writeln!(out, "Failed:  {}", result.failed);
    let _ = writeln!(out, "Skipped: {}", result.skipped);
    if let Some(error) = &result.error {
        let _ = writeln!(out, "Error:   {error}");
    }
    let _ = write!(out, "\n{}", result.verdict().banner());
    out
}

/// Writes `result` as pretty-printed JSON, creating parent directories.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_report(path: &Path, result: &RunResult) -> Result<(), String> {
    let json = serde_json::to_string_pretty(result)
        .map_err(|e| format!("Failed to serialize report: {e}"))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create report directory {}: {e}", parent.display()))?;
    }
    std::fs::write(path, json).map_err(|e| format!("Failed to write report {}: {e}", path.display()))
}
