//! Core DSL: values, AST, parser and evaluation context
//!
//! A configuration tree is parsed into [`Step`]s, [`Predicate`]s and
//! [`Expression`]s, which are evaluated against a [`Context`].

pub mod config;
pub mod context;
pub mod error;
pub mod expression;
pub mod predicate;
pub mod step;
pub mod template;
pub mod value;

pub use config::{parse_expression, parse_predicate, parse_step, Configuration, Phase};
pub use context::{ConfigFlags, Context, Evaluate, Namespace};
pub use error::{ConfigError, EvalError, ParseError, ParseErrorKind};
pub use expression::Expression;
pub use predicate::Predicate;
pub use step::{Branch, Step};
pub use value::Value;
