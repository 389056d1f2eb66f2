//! GridForge Core - parser front end for the grid constraint language
//!
//! A document describes an integer grid `A` and the conditions its cells
//! must satisfy:
//!
//! ```text
//! 2 , 2 ;
//! A[i][j] >= 1 ;
//! A[0][0] = 5 ;
//! ```
//!
//! This crate turns such text into syntax trees. It knows nothing about
//! solving; see the `gridforge-solver` crate for that.
//!
//! - [`combinator`] - a small parser-combinator engine
//! - [`lexical`] - character, number, identifier and token scanners
//! - [`grammar`] - the expression, comparison and document rules
//! - [`ast`] - the trees the grammar produces
//!
//! ```
//! use gridforge_core::{Document, Relation};
//!
//! let doc = Document::parse("2 , 2 ;\nA[i][j] >= 1 ;\nA[0][0] = 5 ;").unwrap();
//! assert_eq!(doc.dimension.rows, 2);
//! assert_eq!(doc.conditions[1].relation, Relation::Eq);
//! ```

pub mod ast;
pub mod combinator;
pub mod error;
pub mod grammar;
pub mod lexical;

pub use ast::{Condition, Dimension, Expression, Relation};
pub use error::{DocumentError, LineFailure, Result};
pub use grammar::{parse_condition, parse_dimension, parse_expression, Document};
