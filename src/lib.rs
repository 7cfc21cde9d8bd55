//! clictl - gate a command behind a small declarative pipeline

pub mod cli;
pub mod core;
pub mod execution;
pub mod shell;

// Re-export commonly used types
pub use core::{Configuration, Context, EvalError, Evaluate, ParseError, Predicate, Step, Value};
pub use execution::{ExecutionEngine, ExecutionEvent};
pub use shell::{ShellExecutor, SystemShell};
