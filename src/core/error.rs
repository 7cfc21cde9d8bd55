//! Error types for parsing and evaluating the DSL

use crate::shell::ShellError;
use thiserror::Error;

/// A configuration tree that could not be turned into an AST
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} (at {})", .kind, display_path(.path))]
pub struct ParseError {
    /// Location of the offending node, e.g. `pipeline[0].if.then`
    pub path: String,

    /// What was wrong with it
    pub kind: ParseErrorKind,
}

/// The different ways a configuration node can be malformed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unknown pipeline step \"{0}\"")]
    UnknownStep(String),

    #[error("unknown predicate of type \"{0}\"")]
    UnknownPredicate(String),

    #[error("unknown key \"{0}\"")]
    UnknownKey(String),

    #[error("missing required field \"{0}\"")]
    MissingField(&'static str),

    #[error("expected a mapping with exactly one key, found {0}")]
    KeyCount(String),

    #[error("expected {expected}, found {found}")]
    Shape {
        expected: &'static str,
        found: &'static str,
    },
}

impl ParseError {
    pub fn new(path: impl Into<String>, kind: ParseErrorKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "top level"
    } else {
        path
    }
}

/// A configuration document that could not be loaded
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid YAML/JSON: {0}")]
    Syntax(#[from] serde_yaml::Error),

    #[error("configuration is empty")]
    Empty,

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Failures raised while running a pipeline
#[derive(Debug, Error)]
pub enum EvalError {
    /// A `require` gate evaluated to false; carries the rendered node
    #[error("{0}")]
    RequirementNotMet(String),

    #[error("unknown variable \"{0}\"")]
    UnknownVariable(String),

    #[error("invalid template: {0}")]
    Template(String),

    #[error("invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error(transparent)]
    Shell(#[from] ShellError),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl EvalError {
    /// Whether this failure is a closed gate rather than a broken pipeline
    pub fn is_requirement(&self) -> bool {
        matches!(self, EvalError::RequirementNotMet(_))
    }
}
