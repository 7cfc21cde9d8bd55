//! Why a run ended without handing control to the gated command

use crate::cli::output::{format_command_failure, format_config_failure, format_run_failure};
use crate::core::EvalError;
use crate::execution::{COMMAND_NOT_FOUND_EXIT_CODE, FAILURE_EXIT_CODE};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    /// The configuration could not be read or parsed
    #[error(transparent)]
    Config(anyhow::Error),

    /// A gate stayed closed or a step failed
    #[error(transparent)]
    Pipeline(#[from] EvalError),

    /// The gated command could not be started
    #[error(transparent)]
    Command(anyhow::Error),
}

impl RunError {
    /// Process exit code for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Config(_) | RunError::Pipeline(_) => FAILURE_EXIT_CODE,
            RunError::Command(_) => COMMAND_NOT_FOUND_EXIT_CODE,
        }
    }

    /// Styled one-line message for stderr
    pub fn report(&self) -> String {
        match self {
            RunError::Config(e) => format_config_failure(e),
            RunError::Pipeline(e) => format_run_failure(e),
            RunError::Command(e) => format_command_failure(e),
        }
    }
}
