//! Boolean expressions gating `require` and `if`

use crate::core::context::{Context, Evaluate};
use crate::core::error::EvalError;
use crate::core::expression::{join_display, Expression};
use crate::core::value::Value;
use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// A predicate over the context
///
/// `And` and `Or` evaluate every operand before combining them, so side
/// effects of later operands always happen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Predicate {
    True,
    False,
    /// Unanchored regex search of `pattern` in the value of `expr`
    Match { pattern: String, expr: Expression },
    /// Every adjacent pair of values is equal
    Equal { items: Vec<Expression> },
    Not { inner: Box<Predicate> },
    And { items: Vec<Predicate> },
    Or { items: Vec<Predicate> },
}

impl Predicate {
    /// Evaluate and report whether the result is exactly `true`
    pub async fn holds(&self, ctx: &mut Context) -> Result<bool, EvalError> {
        Ok(self.evaluate(ctx).await?.is_true())
    }
}

async fn evaluate_all(items: &[Predicate], ctx: &mut Context) -> Result<Vec<Value>, EvalError> {
    let mut values = Vec::with_capacity(items.len());
    for item in items {
        values.push(item.evaluate(ctx).await?);
    }
    Ok(values)
}

#[async_trait]
impl Evaluate for Predicate {
    async fn evaluate(&self, ctx: &mut Context) -> Result<Value, EvalError> {
        ctx.trace(self);

        let result = match self {
            Predicate::True => true,
            Predicate::False => false,
            Predicate::Match { pattern, expr } => {
                let subject = ctx.eval(expr).await?.to_string();
                Regex::new(pattern)?.is_match(&subject)
            }
            Predicate::Equal { items } => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(ctx.eval(item).await?);
                }
                values.windows(2).all(|pair| pair[0] == pair[1])
            }
            Predicate::Not { inner } => !inner.evaluate(ctx).await?.is_true(),
            Predicate::And { items } => evaluate_all(items, ctx).await?.iter().all(Value::is_true),
            Predicate::Or { items } => evaluate_all(items, ctx).await?.iter().any(Value::is_true),
        };

        Ok(Value::Bool(result))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::True => f.write_str("true"),
            Predicate::False => f.write_str("false"),
            Predicate::Match { pattern, expr } => write!(f, "{} match /{}/", expr, pattern),
            Predicate::Equal { items } => write!(f, "({})", join_display(items, " == ")),
            Predicate::Not { inner } => write!(f, "not ({})", inner),
            Predicate::And { items } => write!(f, "({})", join_display(items, " and ")),
            Predicate::Or { items } => write!(f, "({})", join_display(items, " or ")),
        }
    }
}
