//! Value positions: template literals or nested steps

use crate::core::context::{Context, Evaluate};
use crate::core::error::EvalError;
use crate::core::step::Step;
use crate::core::value::Value;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// Either a `{field}` template or a step whose result becomes the value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Expression {
    Literal(String),
    Step(Box<Step>),
}

impl Expression {
    pub fn literal(text: impl Into<String>) -> Self {
        Expression::Literal(text.into())
    }
}

#[async_trait]
impl Evaluate for Expression {
    async fn evaluate(&self, ctx: &mut Context) -> Result<Value, EvalError> {
        match self {
            Expression::Literal(template) => Ok(Value::Str(ctx.interpolate(template)?)),
            Expression::Step(step) => step.evaluate(ctx).await,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(template) => f.write_str(template),
            Expression::Step(step) => write!(f, "{}", step),
        }
    }
}

/// Render `items` separated by `sep`
pub(crate) fn join_display<T: fmt::Display>(items: &[T], sep: &str) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(sep)
}
