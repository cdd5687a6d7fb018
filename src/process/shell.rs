//! Building shell commands and signalling their process groups.
//!
//! Every command is started in its own process group so that signals reach
//! the whole tree `sh -c` spawns, not just the shell.

use tokio::process::Command;

/// A graceful or forced stop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopSignal {
    /// `SIGTERM`: ask the process to shut down.
    Terminate,
    /// `SIGKILL`: stop it unconditionally.
    Kill,
}

/// Builds a `tokio` command that runs `command` through the system shell.
#[must_use]
pub fn shell_command(command: &str) -> Command {
    #[cfg(unix)]
    {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command).process_group(0);
        cmd
    }
    #[cfg(not(unix))]
    {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    }
}

/// Sends `signal` to the process group led by `pid`.
///
/// Returns `false` if the group no longer exists. On non-unix targets this
/// is a no-op; callers fall back to `Child::start_kill`.
pub fn signal_group(pid: u32, signal: StopSignal) -> bool {
    #[cfg(unix)]
    {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        let Ok(raw) = i32::try_from(pid) else {
            return false;
        };
        let sig = match signal {
            StopSignal::Terminate => Signal::SIGTERM,
            StopSignal::Kill => Signal::SIGKILL,
        };
        killpg(Pid::from_raw(raw), sig).is_ok()
    }
    #[cfg(not(unix))]
    {
        let _ = (pid, signal);
        false
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shell_command_runs_through_shell() {
        let output = shell_command("echo $((1 + 2))").output().await.unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "3");
    }

    #[tokio::test]
    async fn signalling_a_finished_group_reports_false() {
        let mut child = shell_command("true").spawn().unwrap();
        let pid = child.id().unwrap();
        child.wait().await.unwrap();
        assert!(!signal_group(pid, StopSignal::Terminate));
    }
}
