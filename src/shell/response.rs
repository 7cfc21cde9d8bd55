//! Shell invocation results

use thiserror::Error;

/// Error types for shell invocations
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("failed to spawn shell command `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("shell command `{0}` timed out after {1} seconds")]
    Timeout(String, u64),
}

/// Captured result of a finished shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOutput {
    /// Everything the command wrote to stdout
    pub stdout: String,

    /// Exit code, `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
}

impl ShellOutput {
    pub fn new(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            exit_code: Some(0),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}
