//! Configuration parsing: generic YAML/JSON tree to typed AST
//!
//! A configuration is a mapping with up to three sections, each a list of
//! steps (or a single step):
//!
//! ```yaml
//! before:
//!   - assign: {branch: {shell: git branch --show-current}}
//! pipeline:
//!   - require: {equal: ["{usr.branch}", main]}
//! after:
//!   - echo: "deploying {0}"
//! ```
//!
//! Without any section key the whole document is the pipeline: a mapping is
//! one step, a list is a list of steps.

use crate::core::error::{ConfigError, ParseError, ParseErrorKind};
use crate::core::expression::Expression;
use crate::core::predicate::Predicate;
use crate::core::step::{Branch, Step};
use crate::core::value::Value;
use anyhow::{Context as _, Result};
use serde::Serialize;
use serde_yaml::{Mapping, Value as Node};
use std::fmt;
use std::path::Path;

/// The three phases of a run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Before,
    Pipeline,
    After,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Before, Phase::Pipeline, Phase::After];

    pub fn key(self) -> &'static str {
        match self {
            Phase::Before => "before",
            Phase::Pipeline => "pipeline",
            Phase::After => "after",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        Phase::ALL.into_iter().find(|phase| phase.key() == key)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A parsed configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Configuration {
    pub before: Vec<Step>,
    pub pipeline: Vec<Step>,
    pub after: Vec<Step>,
}

impl Configuration {
    /// Load a configuration from a YAML or JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Ok(Self::from_yaml(&content)?)
    }

    /// Parse a configuration from YAML (or JSON) text
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Err(ConfigError::Empty);
        }
        let tree: Node = serde_yaml::from_str(yaml)?;
        if tree.is_null() {
            return Err(ConfigError::Empty);
        }
        Ok(Self::from_tree(&tree)?)
    }

    /// Parse a configuration from an already-loaded tree
    pub fn from_tree(tree: &Node) -> Result<Self, ParseError> {
        let mut config = Configuration::default();

        match tree {
            Node::Mapping(map) => {
                let has_section = map
                    .keys()
                    .any(|key| key.as_str().and_then(Phase::from_key).is_some());

                if !has_section {
                    if !map.is_empty() {
                        config.pipeline.push(parse_step(tree, "")?);
                    }
                    return Ok(config);
                }

                for (key, value) in map {
                    let phase = key
                        .as_str()
                        .and_then(Phase::from_key)
                        .ok_or_else(|| unknown_key("", key))?;
                    *config.steps_mut(phase) = parse_section(value, phase.key())?;
                }
            }
            Node::Sequence(items) => {
                config.pipeline = parse_step_list(items, "")?;
            }
            other => return Err(shape("", "a mapping or a list", other)),
        }

        Ok(config)
    }

    /// Steps of one phase
    pub fn steps(&self, phase: Phase) -> &[Step] {
        match phase {
            Phase::Before => &self.before,
            Phase::Pipeline => &self.pipeline,
            Phase::After => &self.after,
        }
    }

    fn steps_mut(&mut self, phase: Phase) -> &mut Vec<Step> {
        match phase {
            Phase::Before => &mut self.before,
            Phase::Pipeline => &mut self.pipeline,
            Phase::After => &mut self.after,
        }
    }

    /// Phases paired with their steps, in execution order
    pub fn phases(&self) -> impl Iterator<Item = (Phase, &[Step])> {
        Phase::ALL.into_iter().map(move |phase| (phase, self.steps(phase)))
    }

    /// Total number of top-level steps
    pub fn len(&self) -> usize {
        self.before.len() + self.pipeline.len() + self.after.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parse a step node: a one-key mapping naming the step
pub fn parse_step(node: &Node, path: &str) -> Result<Step, ParseError> {
    let map = node
        .as_mapping()
        .ok_or_else(|| shape(path, "a step mapping", node))?;
    let (name, definition) = single_entry(map, path)?;
    let here = child(path, &name);

    let step = match name.as_str() {
        "require" => Step::Require {
            predicate: parse_predicate(definition, &here)?,
        },
        "if" => parse_if(definition, &here)?,
        "echo" => Step::Echo {
            msg: parse_expression(definition, &here)?,
        },
        "shell" => Step::ShellExec {
            cmd: scalar_text(definition)
                .ok_or_else(|| shape(&here, "a command string", definition))?,
        },
        "assign" => {
            let target = definition
                .as_mapping()
                .ok_or_else(|| shape(&here, "a mapping of one variable name", definition))?;
            let (path, value) = single_entry(target, &here)?;
            let value = parse_expression(value, &child(&here, &path))?;
            Step::Assign { path, value }
        }
        _ => {
            return Err(ParseError::new(path, ParseErrorKind::UnknownStep(name)));
        }
    };

    Ok(step)
}

/// Parse a predicate node: a boolean literal or a one-key mapping
pub fn parse_predicate(node: &Node, path: &str) -> Result<Predicate, ParseError> {
    let map = match node {
        Node::Bool(true) => return Ok(Predicate::True),
        Node::Bool(false) => return Ok(Predicate::False),
        Node::Mapping(map) => map,
        other => return Err(shape(path, "a boolean or a predicate mapping", other)),
    };
    let (name, definition) = single_entry(map, path)?;
    let here = child(path, &name);

    let predicate = match name.as_str() {
        "and" => Predicate::And {
            items: parse_predicate_list(definition, &here)?,
        },
        "or" => Predicate::Or {
            items: parse_predicate_list(definition, &here)?,
        },
        "not" => Predicate::Not {
            inner: Box::new(parse_predicate(definition, &here)?),
        },
        "match" => {
            let target = definition
                .as_mapping()
                .ok_or_else(|| shape(&here, "a mapping of one pattern", definition))?;
            let (pattern, expr) = single_entry(target, &here)?;
            let expr = parse_expression(expr, &child(&here, &pattern))?;
            Predicate::Match { pattern, expr }
        }
        "equal" | "eq" | "==" => Predicate::Equal {
            items: parse_expression_list(definition, &here)?,
        },
        "neq" | "!=" => Predicate::Not {
            inner: Box::new(Predicate::Equal {
                items: parse_expression_list(definition, &here)?,
            }),
        },
        _ => {
            return Err(ParseError::new(path, ParseErrorKind::UnknownPredicate(name)));
        }
    };

    Ok(predicate)
}

/// Parse a value position: scalars are templates, mappings are nested steps
pub fn parse_expression(node: &Node, path: &str) -> Result<Expression, ParseError> {
    if let Some(text) = scalar_text(node) {
        return Ok(Expression::Literal(text));
    }
    match node {
        Node::Mapping(_) => Ok(Expression::Step(Box::new(parse_step(node, path)?))),
        other => Err(shape(path, "a string or a step", other)),
    }
}

fn parse_if(node: &Node, path: &str) -> Result<Step, ParseError> {
    let map = node
        .as_mapping()
        .ok_or_else(|| shape(path, "a mapping with a condition", node))?;

    let mut condition = None;
    let mut thens = None;
    let mut elses = None;

    for (key, value) in map {
        match key.as_str() {
            Some("condition") => {
                condition = Some(parse_predicate(value, &child(path, "condition"))?);
            }
            Some("then") => thens = Some(parse_branch(value, &child(path, "then"))?),
            Some("else") => elses = Some(parse_branch(value, &child(path, "else"))?),
            _ => return Err(unknown_key(path, key)),
        }
    }

    let condition =
        condition.ok_or_else(|| ParseError::new(path, ParseErrorKind::MissingField("condition")))?;

    Ok(Step::If {
        condition,
        thens,
        elses,
    })
}

fn parse_branch(node: &Node, path: &str) -> Result<Branch, ParseError> {
    match node {
        Node::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| parse_expression(item, &index(path, i)))
            .collect::<Result<Vec<_>, _>>()
            .map(Branch::Sequence),
        other => parse_expression(other, path).map(Branch::Single),
    }
}

fn parse_section(node: &Node, path: &str) -> Result<Vec<Step>, ParseError> {
    match node {
        Node::Null => Ok(Vec::new()),
        Node::Sequence(items) => parse_step_list(items, path),
        Node::Mapping(_) => Ok(vec![parse_step(node, path)?]),
        other => Err(shape(path, "a list of steps", other)),
    }
}

fn parse_step_list(items: &[Node], path: &str) -> Result<Vec<Step>, ParseError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_step(item, &index(path, i)))
        .collect()
}

fn parse_predicate_list(node: &Node, path: &str) -> Result<Vec<Predicate>, ParseError> {
    match node {
        Node::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| parse_predicate(item, &index(path, i)))
            .collect(),
        single => Ok(vec![parse_predicate(single, path)?]),
    }
}

fn parse_expression_list(node: &Node, path: &str) -> Result<Vec<Expression>, ParseError> {
    match node {
        Node::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| parse_expression(item, &index(path, i)))
            .collect(),
        other => Err(shape(path, "a list of values", other)),
    }
}

/// The only key of a one-entry mapping, as text, with its value
fn single_entry<'a>(map: &'a Mapping, path: &str) -> Result<(String, &'a Node), ParseError> {
    let mut entries = map.iter();
    match (entries.next(), entries.next()) {
        (Some((key, value)), None) => {
            let name = scalar_text(key).ok_or_else(|| shape(path, "a text key", key))?;
            Ok((name, value))
        }
        (None, _) => Err(ParseError::new(
            path,
            ParseErrorKind::KeyCount("no keys".to_string()),
        )),
        (Some(_), Some(_)) => {
            let keys = map
                .keys()
                .map(|key| scalar_text(key).unwrap_or_else(|| describe(key).to_string()))
                .collect::<Vec<_>>()
                .join(", ");
            Err(ParseError::new(
                path,
                ParseErrorKind::KeyCount(format!("keys {}", keys)),
            ))
        }
    }
}

/// Text of a scalar node; numbers and booleans keep their YAML spelling
fn scalar_text(node: &Node) -> Option<String> {
    match node {
        Node::String(s) => Some(s.clone()),
        Node::Number(n) => Some(n.to_string()),
        Node::Bool(b) => Some(Value::Bool(*b).to_string()),
        _ => None,
    }
}

fn describe(node: &Node) -> &'static str {
    match node {
        Node::Null => "null",
        Node::Bool(_) => "a boolean",
        Node::Number(_) => "a number",
        Node::String(_) => "a string",
        Node::Sequence(_) => "a list",
        Node::Mapping(_) => "a mapping",
        Node::Tagged(_) => "a tagged value",
    }
}

fn shape(path: &str, expected: &'static str, found: &Node) -> ParseError {
    ParseError::new(
        path,
        ParseErrorKind::Shape {
            expected,
            found: describe(found),
        },
    )
}

fn unknown_key(path: &str, key: &Node) -> ParseError {
    let key = scalar_text(key).unwrap_or_else(|| describe(key).to_string());
    ParseError::new(path, ParseErrorKind::UnknownKey(key))
}

fn child(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn index(path: &str, i: usize) -> String {
    format!("{}[{}]", path, i)
}
