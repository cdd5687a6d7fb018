//! Live command executor built on `tokio::process`.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tracing::debug;

use crate::error::ExecError;
use crate::ports::shell::{CommandExecutor, ShellFuture, ShellOutput};
use crate::process::shell::{shell_command, signal_group, StopSignal};

/// Runs commands via the system shell, killing them when they overrun.
pub struct LiveCommandExecutor;

impl CommandExecutor for LiveCommandExecutor {
    fn run<'a>(
        &'a self,
        command: &'a str,
        working_dir: &'a Path,
        timeout: Duration,
    ) -> ShellFuture<'a> {
        Box::pin(async move {
            debug!(command, cwd = %working_dir.display(), "running command");
            let child = shell_command(command)
                .current_dir(working_dir)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .spawn()
                .map_err(|source| ExecError::CommandFailed { command: command.to_string(), source })?;
            let pid = child.id();

            let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
                Ok(result) => result
                    .map_err(|source| ExecError::CommandFailed { command: command.to_string(), source })?,
                Err(_) => {
                    // The shell itself dies with the dropped future; take its children too.
                    if let Some(pid) = pid {
                        signal_group(pid, StopSignal::Kill);
                    }
                    return Err(ExecError::CommandTimeout { command: command.to_string(), timeout });
                }
            };

            let exit_code = output.status.code().unwrap_or(-1);
            debug!(command, exit_code, "command finished");
            Ok(ShellOutput {
                exit_code,
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        })
    }
}
