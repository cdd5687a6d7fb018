//! Long-running service processes.
//!
//! A [`ManagedProcess`] owns one launched child for the length of a run.
//! Its stdout and stderr are drained by background tasks into one bounded
//! line queue, so the owner can poll for output without ever blocking on a
//! line that is never written.

pub mod shell;

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, warn};

use self::shell::{shell_command, signal_group, StopSignal};

/// Lines buffered between the drain tasks and the owner. Lines beyond this
/// are dropped rather than stalling the child on a full pipe.
const LINE_QUEUE_CAPACITY: usize = 1024;

/// Result of waiting for the next output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// A complete line, without its trailing newline.
    Line(String),
    /// Nothing arrived within the wait.
    Idle,
    /// Both output streams have closed.
    Closed,
}

/// A launched process with combined, line-oriented output.
pub struct ManagedProcess {
    command: String,
    child: Child,
    pid: Option<u32>,
    lines: mpsc::Receiver<String>,
    exit: Option<ExitStatus>,
}

impl ManagedProcess {
    /// Launches `command` through the shell in `cwd`.
    ///
    /// Must be called from within a Tokio runtime; the drain tasks are
    /// spawned onto it.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the shell cannot be spawned.
    pub fn spawn(command: &str, cwd: &Path) -> std::io::Result<Self> {
        let mut child = shell_command(command)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let (tx, rx) = mpsc::channel(LINE_QUEUE_CAPACITY);
        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(drain_lines(stdout, tx.clone(), "stdout"));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(drain_lines(stderr, tx, "stderr"));
        }

        let pid = child.id();
        info!(pid, command, "launched service process");
        Ok(Self { command: command.to_string(), child, pid, lines: rx, exit: None })
    }

    /// The command this process was launched with.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// OS process id, if the process has not been reaped yet at spawn time.
    #[must_use]
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Polls liveness without blocking. Records the exit status once seen.
    pub fn is_alive(&mut self) -> bool {
        if self.exit.is_some() {
            return false;
        }
        match self.child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                debug!(pid = self.pid, %status, "service process exited");
                self.exit = Some(status);
                false
            }
            Err(e) => {
                warn!(pid = self.pid, error = %e, "could not poll service process");
                false
            }
        }
    }

    /// Exit code, once the process is known to have exited normally.
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        self.exit.and_then(|status| status.code())
    }

    /// Returns a queued line if one is available right now.
    pub fn read_line_nonblocking(&mut self) -> Option<String> {
        self.lines.try_recv().ok()
    }

    /// Waits up to `wait` for the next line.
    pub async fn next_line(&mut self, wait: Duration) -> LineEvent {
        match tokio::time::timeout(wait, self.lines.recv()).await {
            Ok(Some(line)) => LineEvent::Line(line),
            Ok(None) => LineEvent::Closed,
            Err(_) => LineEvent::Idle,
        }
    }

    /// Asks the process group to stop (`SIGTERM`).
    pub fn terminate(&mut self) {
        if let Some(pid) = self.pid {
            signal_group(pid, StopSignal::Terminate);
        }
    }

    /// Stops the process group unconditionally (`SIGKILL`).
    pub fn kill(&mut self) {
        if let Some(pid) = self.pid {
            signal_group(pid, StopSignal::Kill);
        }
        let _ = self.child.start_kill();
    }

    /// Two-phase shutdown: terminate, wait up to `grace`, then kill and wait.
    ///
    /// Safe to call repeatedly and after the process exited on its own.
    pub async fn shutdown(&mut self, grace: Duration) -> Option<ExitStatus> {
        if self.is_alive() {
            self.terminate();
            match tokio::time::timeout(grace, self.child.wait()).await {
                Ok(Ok(status)) => self.exit = Some(status),
                Ok(Err(e)) => warn!(pid = self.pid, error = %e, "waiting for service process"),
                Err(_) => {
                    warn!(pid = self.pid, grace_secs = grace.as_secs(), "service ignored SIGTERM; killing");
                    self.kill();
                    match self.child.wait().await {
                        Ok(status) => self.exit = Some(status),
                        Err(e) => warn!(pid = self.pid, error = %e, "waiting for killed service process"),
                    }
                }
            }
        }

        // Leftover members of the group (e.g. `server &` under the shell).
        if let Some(pid) = self.pid {
            signal_group(pid, StopSignal::Kill);
        }
        self.exit
    }
}

impl Drop for ManagedProcess {
    fn drop(&mut self) {
        if self.exit.is_none() {
            self.kill();
        }
    }
}

async fn drain_lines<R>(reader: R, tx: mpsc::Sender<String>, stream: &'static str)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf).trim_end_matches(['\r', '\n']).to_string();
                debug!(target: "vouch::service", stream, "{line}");
                match tx.try_send(line) {
                    Ok(()) | Err(TrySendError::Closed(_)) => {}
                    Err(TrySendError::Full(_)) => debug!(stream, "line queue full; dropping line"),
                }
            }
            Err(e) => {
                debug!(stream, error = %e, "stopped draining service output");
                break;
            }
        }
    }
}
