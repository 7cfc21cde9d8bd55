use anyhow::{Context as _, Result};
use clictl::cli::output::format_configuration;
use clictl::cli::{Cli, RunError};
use clictl::core::{ConfigFlags, Configuration, Context};
use clictl::execution::{run_command, ExecutionEngine};
use clictl::shell::SystemShell;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    if cli.verbose {
        // Node traces survive any RUST_LOG
        filter = filter.add_directive("clictl::trace=info".parse()?);
    }
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    match run(&cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}", e.report());
            if cli.verbose {
                eprintln!("{:?}", e);
            }
            std::process::exit(e.exit_code());
        }
    }
}

/// Load, check or run the configuration; returns the exit code on success
async fn run(cli: &Cli) -> Result<i32, RunError> {
    let config = load_configuration(cli).map_err(RunError::Config)?;

    if cli.check {
        if cli.json {
            let json = serde_json::to_string_pretty(&config)
                .context("Failed to serialize configuration")
                .map_err(RunError::Config)?;
            println!("{}", json);
        } else {
            print!("{}", format_configuration(&config));
        }
        return Ok(0);
    }

    let mut ctx = Context::from_env(cli.command.clone())
        .with_flags(ConfigFlags { force: cli.force })
        .with_verbosity(u8::from(cli.verbose))
        .with_shell(Arc::new(SystemShell::with_timeout(cli.shell_timeout)));

    let mut engine = ExecutionEngine::new();
    engine.add_event_handler(|event| debug!("{}", event));
    engine.run(&config, &mut ctx).await?;

    if cli.command.is_empty() {
        return Ok(0);
    }

    run_command(&cli.command).await.map_err(RunError::Command)
}

fn load_configuration(cli: &Cli) -> Result<Configuration> {
    if let Some(path) = &cli.config_file {
        return Configuration::from_file(path);
    }
    match &cli.config {
        Some(text) => Ok(Configuration::from_yaml(text)?),
        None => Ok(Configuration::default()),
    }
}
