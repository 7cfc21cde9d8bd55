//! `sh -c` subprocess runner

use crate::shell::{ShellError, ShellOutput};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// Runs commands through a POSIX shell and captures stdout
#[derive(Debug, Clone)]
pub struct SubprocessShell {
    /// Shell executable, invoked as `<shell> -c <command>`
    shell_path: String,

    /// Optional upper bound on a single command, in seconds
    timeout_secs: Option<u64>,
}

impl SubprocessShell {
    /// Create a runner for the given shell executable
    ///
    /// # Arguments
    /// * `shell_path` - Path to the shell (e.g., "sh", "/bin/bash")
    /// * `timeout_secs` - Kill the command after this many seconds; `None` waits forever
    pub fn new(shell_path: String, timeout_secs: Option<u64>) -> Self {
        Self {
            shell_path,
            timeout_secs,
        }
    }

    /// Get the shell executable path
    #[cfg(test)]
    pub fn shell_path(&self) -> &str {
        &self.shell_path
    }

    /// Run `command` and wait for it to finish
    ///
    /// Stdin and stderr are inherited from this process. The exit status is
    /// reported back but never turned into an error.
    ///
    /// # Errors
    /// Returns `ShellError` if:
    /// - The shell cannot be spawned
    /// - The command outlives the configured timeout
    pub async fn execute(&self, command: &str) -> Result<ShellOutput, ShellError> {
        debug!("Spawning {} -c {:?}", self.shell_path, command);

        let child = Command::new(&self.shell_path)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .output();

        let result = match self.timeout_secs {
            Some(secs) => timeout(Duration::from_secs(secs), child)
                .await
                .map_err(|_| ShellError::Timeout(command.to_string(), secs))?,
            None => child.await,
        };

        let output = result.map_err(|source| ShellError::Spawn {
            command: command.to_string(),
            source,
        })?;

        let output = ShellOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            exit_code: output.status.code(),
        };
        if !output.success() {
            debug!("`{}` exited with {:?}; ignoring", command, output.exit_code);
        }

        Ok(output)
    }
}
