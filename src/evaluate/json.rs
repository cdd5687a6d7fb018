//! Golden-file JSON comparison.

use std::path::Path;

use serde_json::Value;

/// What the parsed JSON came from; only changes the failure wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonSubject {
    /// A command's standard output.
    Stdout,
    /// An HTTP response body.
    ResponseBody,
}

impl JsonSubject {
    fn invalid(self, error: &serde_json::Error) -> String {
        match self {
            Self::Stdout => format!("Invalid JSON output: {error}"),
            Self::ResponseBody => format!("Invalid JSON response: {error}"),
        }
    }

    fn mismatch(self) -> String {
        match self {
            Self::Stdout => "JSON output doesn't match golden file".to_string(),
            Self::ResponseBody => "JSON doesn't match golden file".to_string(),
        }
    }
}

/// Structural JSON equality.
///
/// Object key order is ignored, array order is not. Numbers compare by
/// value, so `1` equals `1.0`.
#[must_use]
pub fn json_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter().all(|(key, value)| b.get(key).is_some_and(|other| json_equal(value, other)))
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| json_equal(x, y))
        }
        (Value::Number(a), Value::Number(b)) => {
            if a.is_f64() || b.is_f64() {
                a.as_f64() == b.as_f64()
            } else {
                a == b
            }
        }
        _ => actual == expected,
    }
}

/// Compares `actual_text` against the golden file at `challenge_dir/relative`.
///
/// Failures are distinguished: golden file missing, golden file unreadable,
/// actual text not JSON, and structural mismatch.
///
/// # Errors
///
/// Returns the human-readable failure reason.
pub fn check_golden(
    challenge_dir: &Path,
    relative: &str,
    actual_text: &str,
    subject: JsonSubject,
) -> Result<(), String> {
    let golden_path = challenge_dir.join(relative);
    if !golden_path.exists() {
        return Err(format!("Golden file not found: {}", golden_path.display()));
    }

    let golden_text = std::fs::read_to_string(&golden_path)
        .map_err(|e| format!("Failed to read golden file {}: {e}", golden_path.display()))?;
    let expected: Value = serde_json::from_str(&golden_text)
        .map_err(|e| format!("Invalid golden file {}: {e}", golden_path.display()))?;

    let actual: Value = serde_json::from_str(actual_text).map_err(|e| subject.invalid(&e))?;

    if json_equal(&actual, &expected) {
        Ok(())
    } else {
        Err(subject.mismatch())
    }
}
