//! Pipeline execution

pub mod command;
pub mod engine;

pub use command::{run_command, COMMAND_NOT_FOUND_EXIT_CODE};
pub use engine::{EventHandler, ExecutionEngine, ExecutionEvent};

/// Exit code for a closed gate, an invalid configuration or a failed step
pub const FAILURE_EXIT_CODE: i32 = 2;
