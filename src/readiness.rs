//! Waiting for a launched service to announce it is ready.

use std::time::{Duration, Instant};

use regex::Regex;
use tracing::debug;

use crate::error::ReadinessError;
use crate::process::{LineEvent, ManagedProcess};

/// Poll cadence and post-match delay for readiness detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessTiming {
    /// Longest single wait for a line before liveness is checked again.
    pub poll_interval: Duration,
    /// Pause after the ready line so listeners can finish binding.
    pub settle_delay: Duration,
}

impl Default for ReadinessTiming {
    fn default() -> Self {
        Self { poll_interval: Duration::from_millis(500), settle_delay: Duration::from_secs(2) }
    }
}

/// Waits until `process` prints a line matching `pattern`.
///
/// Returns the matching line. Fails immediately once the process has
/// exited, and with [`ReadinessError::ReadinessTimeout`] when `timeout`
/// elapses first.
///
/// # Errors
///
/// See above.
pub async fn wait_for_ready(
    process: &mut ManagedProcess,
    pattern: &Regex,
    timeout: Duration,
    timing: ReadinessTiming,
) -> Result<String, ReadinessError> {
    // A timeout too large to represent means no deadline at all.
    let deadline = Instant::now().checked_add(timeout);

    loop {
        while let Some(line) = process.read_line_nonblocking() {
            if pattern.is_match(&line) {
                return settle(line, timing).await;
            }
        }

        let now = Instant::now();
        let remaining = match deadline {
            Some(deadline) if now >= deadline => return Err(ReadinessError::ReadinessTimeout(timeout)),
            Some(deadline) => deadline - now,
            None => timing.poll_interval,
        };
        if !process.is_alive() {
            return Err(ReadinessError::ProcessDiedDuringStartup(process.exit_code()));
        }

        let wait = timing.poll_interval.min(remaining);
        match process.next_line(wait).await {
            LineEvent::Line(line) if pattern.is_match(&line) => return settle(line, timing).await,
            LineEvent::Line(_) | LineEvent::Idle => {}
            // Output closed; the process is on its way out or went quiet for good.
            LineEvent::Closed => tokio::time::sleep(wait).await,
        }
    }
}

async fn settle(line: String, timing: ReadinessTiming) -> Result<String, ReadinessError> {
    debug!(line = %line, "ready pattern matched");
    tokio::time::sleep(timing.settle_delay).await;
    Ok(line)
}
