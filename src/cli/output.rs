//! CLI output formatting

use crate::core::{Configuration, EvalError};
use console::Emoji;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");

/// Message for a run that stopped before the gated command
pub fn format_run_failure(error: &EvalError) -> String {
    if error.is_requirement() {
        format!(
            "{}{} {}",
            WARN,
            style("Requirement not met:").yellow().for_stderr(),
            error
        )
    } else {
        format!(
            "{}{} {}",
            CROSS,
            style("Error in pipeline:").red().for_stderr(),
            error
        )
    }
}

/// Message for a configuration that could not be loaded or parsed
pub fn format_config_failure(error: &anyhow::Error) -> String {
    format!(
        "{}{} {:#}",
        CROSS,
        style("Invalid configuration:").red().for_stderr(),
        error
    )
}

/// Message for a gated command that could not be started
pub fn format_command_failure(error: &anyhow::Error) -> String {
    format!(
        "{}{} {:#}",
        CROSS,
        style("Could not run command:").red().for_stderr(),
        error
    )
}

/// Human-readable listing of a parsed configuration
pub fn format_configuration(config: &Configuration) -> String {
    let mut out = format!(
        "{}Configuration is valid ({} steps)\n",
        CHECK,
        style(config.len()).cyan()
    );
    for (phase, steps) in config.phases() {
        out.push_str(&format!("{}:\n", style(phase).bold()));
        if steps.is_empty() {
            out.push_str(&format!("  {}\n", style("(none)").dim()));
        }
        for (index, step) in steps.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", index + 1, step));
        }
    }
    out
}
