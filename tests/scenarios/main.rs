//! Scenario-based tests for clictl pipelines

mod helpers;

mod conditionals;
mod interpolation;
mod phases;
mod shell_steps;
