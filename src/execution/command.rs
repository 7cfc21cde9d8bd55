//! Running the gated command once every phase has passed

use anyhow::{Context as _, Result};
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tracing::debug;

/// Exit code used when the gated command cannot be started
pub const COMMAND_NOT_FOUND_EXIT_CODE: i32 = 127;

/// Run `argv` with inherited stdio and wait for it
///
/// Returns the exit code to propagate.
pub async fn run_command(argv: &[String]) -> Result<i32> {
    let (program, args) = argv
        .split_first()
        .context("No command to run")?;

    debug!("Running gated command {:?}", argv);

    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .with_context(|| format!("Failed to run `{}`", program))?;

    Ok(exit_code(status))
}

/// Exit code for a finished process; signals map to `128 + signal`
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
