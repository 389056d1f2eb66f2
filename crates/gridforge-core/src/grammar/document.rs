//! Whole documents: a dimension header followed by one condition per line.

use std::fmt;

use tracing::{debug, warn};

use crate::ast::{Condition, Dimension};
use crate::combinator::{lift, map, parse_all, rule, sequence, ParseOutcome, Parser};
use crate::error::{DocumentError, LineFailure, Result};
use crate::grammar::comparison::condition;
use crate::lexical::{character, natural_number, token};

/// A parsed document. Each parse produces a fresh value; nothing is shared
/// between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    pub dimension: Dimension,
    /// Conditions in file order.
    pub conditions: Vec<Condition>,
}

impl Document {
    pub fn new(dimension: Dimension, conditions: Vec<Condition>) -> Self {
        Self {
            dimension,
            conditions,
        }
    }

    /// Parses a complete document.
    ///
    /// # Errors
    ///
    /// Fails if line 1 is not a dimension header, or if any later non-blank
    /// line is not a complete condition. Every offending line is listed in
    /// the error; nothing is accepted partially.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().enumerate();

        let (_, header) = lines.next().ok_or(DocumentError::MissingDimension)?;
        let dimension =
            parse_all(rule(dimension), header).ok_or_else(|| DocumentError::InvalidDimension {
                text: header.to_string(),
            })?;

        let mut conditions = Vec::new();
        let mut failures = Vec::new();

        for (index, line) in lines {
            if line.trim().is_empty() {
                continue;
            }
            match parse_all(rule(condition), line) {
                Some(cond) => conditions.push(cond),
                None => {
                    warn!(event = "condition_rejected", line = index + 1, text = line);
                    failures.push(LineFailure {
                        line: index + 1,
                        text: line.to_string(),
                    });
                }
            }
        }

        if !failures.is_empty() {
            return Err(DocumentError::InvalidConditions(failures));
        }

        debug!(
            event = "document_parsed",
            rows = dimension.rows,
            cols = dimension.cols,
            condition_count = conditions.len(),
        );

        Ok(Self::new(dimension, conditions))
    }
}

/// Canonical text: the header line followed by one condition per line.
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.dimension)?;
        for cond in &self.conditions {
            writeln!(f, "{cond}")?;
        }
        Ok(())
    }
}

/// `<nat> , <nat> ;` with whitespace allowed anywhere between the parts.
pub fn dimension(input: &str) -> ParseOutcome<'_, Dimension> {
    sequence(token(size()), |rows: usize| {
        sequence(token(character(',')), move |_| {
            sequence(token(size()), move |cols: usize| {
                map(token(character(';')), move |_| Dimension::new(rows, cols))
            })
        })
    })
    .parse(input)
}

fn size() -> impl Parser<Output = usize> {
    sequence(natural_number(), |n: i64| lift(usize::try_from(n).ok()))
}
