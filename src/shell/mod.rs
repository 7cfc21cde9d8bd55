//! Shell command execution for `shell` steps

pub mod response;
pub mod subprocess;

use async_trait::async_trait;
pub use response::{ShellError, ShellOutput};
pub use subprocess::SubprocessShell;

/// Trait for shell execution - allows swapping the real shell for a fake
#[async_trait]
pub trait ShellExecutor: Send + Sync {
    /// Run a command line and capture its stdout
    async fn run(&self, command: &str) -> Result<ShellOutput, ShellError>;
}

/// Shell executor backed by `sh -c`
#[derive(Debug, Clone)]
pub struct SystemShell {
    subprocess: SubprocessShell,
}

impl SystemShell {
    /// Shell executor with no timeout
    pub fn new() -> Self {
        Self::with_timeout(None)
    }

    /// Shell executor that kills commands running longer than `timeout_secs`
    pub fn with_timeout(timeout_secs: Option<u64>) -> Self {
        Self {
            subprocess: SubprocessShell::new("sh".to_string(), timeout_secs),
        }
    }
}

impl Default for SystemShell {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ShellExecutor for SystemShell {
    async fn run(&self, command: &str) -> Result<ShellOutput, ShellError> {
        self.subprocess.execute(command).await
    }
}
