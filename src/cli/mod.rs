//! Command-line interface

pub mod error;
pub mod output;

pub use error::RunError;

use clap::{ArgAction, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// Run a command only if a declarative pipeline of checks passes
#[derive(Debug, Parser, Clone)]
#[command(name = "clictl")]
#[command(version)]
#[command(about = "Gate a command behind a small declarative pipeline of checks", long_about = None)]
pub struct Cli {
    /// Inline YAML or JSON configuration
    #[arg(long, conflicts_with = "config_file")]
    pub config: Option<String>,

    /// Path to a YAML or JSON configuration file
    #[arg(long, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Exposed to the pipeline as `config.force`
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true",
        value_parser = parse_bool,
        value_name = "BOOL"
    )]
    pub force: bool,

    /// Log every node before it runs
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true",
        value_parser = parse_bool,
        value_name = "BOOL"
    )]
    pub verbose: bool,

    /// Kill `shell` steps that run longer than this many seconds
    #[arg(long, value_name = "SECS")]
    pub shell_timeout: Option<u64>,

    /// Parse the configuration, print it and exit without running anything
    #[arg(long)]
    pub check: bool,

    /// Print the parsed configuration as JSON (with --check)
    #[arg(long, requires = "check")]
    pub json: bool,

    /// Command to run when the pipeline succeeds; also the positional arguments
    #[arg(last = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}

/// Parse `true`/`True`/`false`/`False`
pub fn parse_bool(s: &str) -> Result<bool, String> {
    match s {
        "true" | "True" => Ok(true),
        "false" | "False" => Ok(false),
        _ => Err(format!("Boolean value expected, found \"{}\"", s)),
    }
}
