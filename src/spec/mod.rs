//! Runtime spec types.
//!
//! Defines the Rust types that mirror the `runtime-spec.yaml` schema.
//! They are decoded once at startup and stay immutable for the run.

use std::time::Duration;

mod adapter_kind;
mod runtime_spec;
mod test_case;

pub use adapter_kind::AdapterKind;
pub use runtime_spec::{Endpoint, Lifecycle, VerificationSpec};
pub use test_case::TestCase;

/// Converts a seconds value from the spec into a [`Duration`].
///
/// Missing or unusable values (negative, NaN) fall back to `default_secs`.
/// Values too large to represent saturate at [`Duration::MAX`].
pub(crate) fn seconds(value: Option<f64>, default_secs: u64) -> Duration {
    match value {
        Some(secs) if is_valid_seconds(secs) => {
            Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
        }
        _ => Duration::from_secs(default_secs),
    }
}

/// Whether `secs` is usable as a timeout.
pub(crate) fn is_valid_seconds(secs: f64) -> bool {
    secs >= 0.0
}
