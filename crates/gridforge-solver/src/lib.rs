//! GridForge Solver
//!
//! This crate turns parsed documents into solver problems:
//! - [`Solver`] - the capability a constraint backend provides
//! - [`instantiate`] / [`generate`] - per-cell expansion of conditions,
//!   objective construction and result extraction
//! - [`SearchSolver`] - the bundled branch-and-bound backend
//!
//! ```
//! use std::time::Duration;
//! use gridforge_core::Document;
//! use gridforge_solver::{generate, GridOutcome, SearchSolver};
//!
//! let doc = Document::parse("2 , 2 ;\nA[i][j] >= 1 ;\nA[0][0] = 5 ;").unwrap();
//! let mut solver = SearchSolver::default();
//! let outcome = generate(&mut solver, doc.dimension, &doc.conditions, Duration::from_secs(5)).unwrap();
//! assert_eq!(outcome, GridOutcome::Solved(vec![vec![5, 1], vec![1, 1]]));
//! ```

pub mod api;
pub mod environment;
pub mod error;
pub mod instantiate;
pub mod search;

#[cfg(test)]
mod test_utils;

pub use api::{SolveStatus, Solver};
pub use environment::Bindings;
pub use error::{InstantiationError, Result, SolverError};
pub use instantiate::{generate, instantiate, lower, solve_grid, GridOutcome, Instantiation};
pub use search::{SearchConfig, SearchSolver};
