//! Test utilities for clictl scenarios

use async_trait::async_trait;
use clictl::core::{ConfigFlags, Configuration, Context, EvalError, Value};
use clictl::execution::ExecutionEngine;
use clictl::shell::{ShellError, ShellExecutor, ShellOutput};
use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Mock shell that records every command and answers from a script
#[derive(Default)]
pub struct RecordingShell {
    responses: HashMap<String, String>,
    commands: Mutex<Vec<String>>,
}

impl RecordingShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `command` with `stdout`; unscripted commands print nothing
    pub fn respond(mut self, command: &str, stdout: &str) -> Self {
        self.responses.insert(command.to_string(), stdout.to_string());
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

#[async_trait]
impl ShellExecutor for RecordingShell {
    async fn run(&self, command: &str) -> Result<ShellOutput, ShellError> {
        self.commands.lock().unwrap().push(command.to_string());
        Ok(ShellOutput::new(
            self.responses.get(command).cloned().unwrap_or_default(),
        ))
    }
}

/// Writer that keeps everything in memory
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Inputs for one scenario run
#[derive(Default)]
pub struct Scenario {
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
    pub force: bool,
    pub shell: Option<Arc<RecordingShell>>,
}

impl Scenario {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.args = args.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn force(mut self) -> Self {
        self.force = true;
        self
    }

    pub fn shell(mut self, shell: RecordingShell) -> Self {
        self.shell = Some(Arc::new(shell));
        self
    }

    /// Parse `yaml` and run it to completion
    pub async fn run(self, yaml: &str) -> ScenarioResult {
        let config = Configuration::from_yaml(yaml).expect("scenario config should parse");
        let stdout = SharedBuffer::default();
        let shell = self.shell.unwrap_or_else(|| Arc::new(RecordingShell::new()));

        let mut ctx = Context::new(self.args, self.env)
            .with_flags(ConfigFlags { force: self.force })
            .with_shell(shell.clone())
            .with_output(Box::new(stdout.clone()));

        let result = ExecutionEngine::new().run(&config, &mut ctx).await;

        ScenarioResult {
            stdout: stdout.contents(),
            result,
            commands: shell.commands(),
            variables: ctx.variables.clone(),
        }
    }
}

/// Everything observable after a scenario run
#[derive(Debug)]
pub struct ScenarioResult {
    pub stdout: String,
    pub result: Result<(), EvalError>,
    pub commands: Vec<String>,
    pub variables: HashMap<String, Value>,
}

impl ScenarioResult {
    pub fn assert_success(&self) -> &Self {
        if let Err(e) = &self.result {
            panic!("expected the run to succeed, got: {}", e);
        }
        self
    }

    pub fn assert_gated(&self) -> &Self {
        match &self.result {
            Err(EvalError::RequirementNotMet(_)) => self,
            other => panic!("expected RequirementNotMet, got {:?}", other),
        }
    }

    pub fn assert_stdout(&self, expected: &str) -> &Self {
        assert_eq!(self.stdout, expected, "unexpected stdout");
        self
    }

    pub fn variable(&self, name: &str) -> Option<String> {
        self.variables.get(name).map(|v| v.to_string())
    }
}
