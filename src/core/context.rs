//! Evaluation context - shared state threaded through a run

use crate::core::error::EvalError;
use crate::core::expression::Expression;
use crate::core::template::{parse_template, Accessor, FieldRef, FieldRoot, Segment};
use crate::core::value::Value;
use crate::shell::{ShellExecutor, SystemShell};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

/// Something that can be run against a [`Context`]
///
/// Implemented by the closed AST families (`Expression`, `Predicate`, `Step`).
#[async_trait]
pub trait Evaluate: fmt::Display + Send + Sync {
    async fn evaluate(&self, ctx: &mut Context) -> Result<Value, EvalError>;
}

/// Static flags surfaced from the command line as `config.*`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigFlags {
    /// `--force`
    pub force: bool,
}

/// Top-level names a template field can start from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Args,
    Env,
    Usr,
    Config,
}

impl FromStr for Namespace {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "args" => Ok(Namespace::Args),
            "env" => Ok(Namespace::Env),
            "usr" => Ok(Namespace::Usr),
            "config" => Ok(Namespace::Config),
            other => Err(EvalError::UnknownVariable(other.to_string())),
        }
    }
}

/// Execution context for a single run
///
/// Created once at startup; `assign` steps are the only thing that mutate it
/// afterwards.
pub struct Context {
    /// Trailing command-line arguments (the gated command and its args)
    pub arguments: Vec<String>,

    /// Process environment
    pub environment: HashMap<String, String>,

    /// The `usr` namespace, written by `assign`
    pub variables: HashMap<String, Value>,

    /// `config.*` flags
    pub flags: ConfigFlags,

    /// Trace level; anything above zero logs every node before it runs
    pub verbosity: u8,

    shell: Arc<dyn ShellExecutor>,
    output: Box<dyn Write + Send>,
}

impl Context {
    /// Create a context writing to stdout and running commands through `sh`
    pub fn new(arguments: Vec<String>, environment: HashMap<String, String>) -> Self {
        Self {
            arguments,
            environment,
            variables: HashMap::new(),
            flags: ConfigFlags::default(),
            verbosity: 0,
            shell: Arc::new(SystemShell::new()),
            output: Box::new(std::io::stdout()),
        }
    }

    /// Create a context from this process's environment
    pub fn from_env(arguments: Vec<String>) -> Self {
        Self::new(arguments, std::env::vars().collect())
    }

    pub fn with_flags(mut self, flags: ConfigFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_shell(mut self, shell: Arc<dyn ShellExecutor>) -> Self {
        self.shell = shell;
        self
    }

    pub fn with_output(mut self, output: Box<dyn Write + Send>) -> Self {
        self.output = output;
        self
    }

    /// Shell used by `shell` steps
    pub fn shell(&self) -> Arc<dyn ShellExecutor> {
        self.shell.clone()
    }

    /// Write one line of program output (the `echo` step)
    pub fn emit(&mut self, line: &str) -> Result<(), EvalError> {
        writeln!(self.output, "{}", line)?;
        self.output.flush()?;
        Ok(())
    }

    /// Log a node about to run, when verbose
    pub fn trace(&self, node: &dyn fmt::Display) {
        if self.verbosity > 0 {
            info!(target: "clictl::trace", "{}", node);
        }
    }

    /// Get a user variable
    pub fn get_variable(&self, key: &str) -> Option<&Value> {
        self.variables.get(key)
    }

    /// Set a user variable
    pub fn set_variable(&mut self, key: String, value: Value) {
        self.variables.insert(key, value);
    }

    /// Evaluate an expression: render a template or run a nested step
    pub async fn eval(&mut self, expr: &Expression) -> Result<Value, EvalError> {
        expr.evaluate(self).await
    }

    /// Render a template string against the arguments and namespaces
    pub fn interpolate(&self, template: &str) -> Result<String, EvalError> {
        let mut rendered = String::with_capacity(template.len());
        for segment in parse_template(template)? {
            match segment {
                Segment::Literal(text) => rendered.push_str(&text),
                Segment::Field(field) => rendered.push_str(&self.resolve(&field)?.render(&field)?),
            }
        }
        Ok(rendered)
    }

    fn resolve(&self, field: &FieldRef) -> Result<Lookup<'_>, EvalError> {
        let unknown = || EvalError::UnknownVariable(field.raw.clone());

        let mut node = match &field.root {
            FieldRoot::Index(i) => Lookup::Leaf(Value::Str(
                self.arguments.get(*i).cloned().ok_or_else(unknown)?,
            )),
            FieldRoot::Name(name) => match name.parse::<Namespace>().map_err(|_| unknown())? {
                Namespace::Args => Lookup::Args(&self.arguments),
                Namespace::Env => Lookup::Env(&self.environment),
                Namespace::Usr => Lookup::Usr(&self.variables),
                Namespace::Config => Lookup::Config(&self.flags),
            },
        };

        for accessor in &field.accessors {
            node = node.descend(accessor).ok_or_else(unknown)?;
        }

        Ok(node)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("arguments", &self.arguments)
            .field("variables", &self.variables)
            .field("flags", &self.flags)
            .field("verbosity", &self.verbosity)
            .finish_non_exhaustive()
    }
}

/// Intermediate position while walking a field's accessors
enum Lookup<'a> {
    Args(&'a [String]),
    Env(&'a HashMap<String, String>),
    Usr(&'a HashMap<String, Value>),
    Config(&'a ConfigFlags),
    Leaf(Value),
}

impl Lookup<'_> {
    fn descend(self, accessor: &Accessor) -> Option<Self> {
        let key = match accessor {
            Accessor::Attr(key) | Accessor::Item(key) => key.as_str(),
        };

        match (self, accessor) {
            (Lookup::Args(args), Accessor::Item(_)) => {
                let index = key.parse::<usize>().ok()?;
                args.get(index).cloned().map(|a| Lookup::Leaf(Value::Str(a)))
            }
            (Lookup::Env(env), _) => env.get(key).cloned().map(|v| Lookup::Leaf(Value::Str(v))),
            (Lookup::Usr(vars), _) => vars.get(key).cloned().map(Lookup::Leaf),
            (Lookup::Config(flags), _) => match key {
                "force" => Some(Lookup::Leaf(Value::Bool(flags.force))),
                _ => None,
            },
            (Lookup::Leaf(Value::List(items)), Accessor::Item(_)) => {
                let index = key.parse::<usize>().ok()?;
                items.get(index).cloned().map(Lookup::Leaf)
            }
            _ => None,
        }
    }

    fn render(&self, field: &FieldRef) -> Result<String, EvalError> {
        match self {
            Lookup::Args(args) => Ok(args.join(" ")),
            Lookup::Leaf(value) => Ok(value.to_string()),
            Lookup::Env(_) | Lookup::Usr(_) | Lookup::Config(_) => Err(EvalError::Template(
                format!("namespace {{{}}} cannot be rendered as text", field.raw),
            )),
        }
    }
}
