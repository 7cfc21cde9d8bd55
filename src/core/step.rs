//! Pipeline steps

use crate::core::context::{Context, Evaluate};
use crate::core::error::EvalError;
use crate::core::expression::{join_display, Expression};
use crate::core::predicate::Predicate;
use crate::core::value::Value;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// A single executable step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    /// Print the value of `msg` on its own line
    Echo { msg: Expression },

    /// Run `cmd` through `sh -c`; the value is its trimmed stdout
    #[serde(rename = "shell")]
    ShellExec { cmd: String },

    /// Store the value in `usr[path]`
    Assign { path: String, value: Expression },

    /// Abort the run unless the predicate holds
    Require { predicate: Predicate },

    /// Evaluate exactly one branch depending on `condition`
    If {
        condition: Predicate,
        thens: Option<Branch>,
        elses: Option<Branch>,
    },
}

/// One arm of an `if`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Branch {
    /// A bare string or a single step; yields that item's value
    Single(Expression),
    /// A list; yields the list of item values
    Sequence(Vec<Expression>),
}

impl Branch {
    async fn run(&self, ctx: &mut Context) -> Result<Value, EvalError> {
        match self {
            Branch::Single(expr) => ctx.eval(expr).await,
            Branch::Sequence(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(ctx.eval(item).await?);
                }
                Ok(Value::List(values))
            }
        }
    }
}

#[async_trait]
impl Evaluate for Step {
    async fn evaluate(&self, ctx: &mut Context) -> Result<Value, EvalError> {
        ctx.trace(self);

        match self {
            Step::Echo { msg } => {
                let text = ctx.eval(msg).await?.to_string();
                ctx.emit(&text)?;
                Ok(Value::Str(text))
            }
            Step::ShellExec { cmd } => {
                let output = ctx.shell().run(cmd).await?;
                Ok(Value::Str(output.stdout.trim_end().to_string()))
            }
            Step::Assign { path, value } => {
                let value = ctx.eval(value).await?;
                ctx.set_variable(path.clone(), value.clone());
                Ok(value)
            }
            Step::Require { predicate } => {
                if predicate.holds(ctx).await? {
                    Ok(Value::None)
                } else {
                    Err(EvalError::RequirementNotMet(self.to_string()))
                }
            }
            Step::If {
                condition,
                thens,
                elses,
            } => {
                let branch = if condition.holds(ctx).await? {
                    thens
                } else {
                    elses
                };
                match branch {
                    Some(branch) => branch.run(ctx).await,
                    None => Ok(Value::None),
                }
            }
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Branch::Single(expr) => write!(f, "{}", expr),
            Branch::Sequence(items) => write!(f, "[{}]", join_display(items, ", ")),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Echo { msg } => write!(f, "echo ({})", msg),
            Step::ShellExec { cmd } => write!(f, "shell ({})", cmd),
            Step::Assign { path, value } => write!(f, "assign ({} := {})", path, value),
            Step::Require { predicate } => write!(f, "require ({})", predicate),
            Step::If {
                condition,
                thens,
                elses,
            } => {
                write!(f, "if ({}) then (", condition)?;
                if let Some(thens) = thens {
                    write!(f, "{}", thens)?;
                }
                f.write_str(") else (")?;
                if let Some(elses) = elses {
                    write!(f, "{}", elses)?;
                }
                f.write_str(")")
            }
        }
    }
}
