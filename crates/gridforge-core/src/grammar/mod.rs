//! The GridForge constraint language.
//!
//! Rules are plain functions returning a [`ParseOutcome`](crate::combinator::ParseOutcome)
//! and may be combined with the engine through [`rule`](crate::combinator::rule).
//! The helpers in this module run a rule over a whole string and reject any
//! unconsumed trailing input.

pub mod comparison;
pub mod document;
pub mod expression;

#[cfg(test)]
mod tests;

use crate::ast::{Condition, Dimension, Expression};
use crate::combinator::{parse_all, rule};

pub use document::Document;

/// Parses a complete expression such as `A[i][j+1] * 2`.
pub fn parse_expression(text: &str) -> Option<Expression> {
    parse_all(rule(expression::expression), text)
}

/// Parses a complete, `;`-terminated condition line.
pub fn parse_condition(text: &str) -> Option<Condition> {
    parse_all(rule(comparison::condition), text)
}

/// Parses a dimension header line.
pub fn parse_dimension(text: &str) -> Option<Dimension> {
    parse_all(rule(document::dimension), text)
}
