//! GridForge - minimal integer grids from a small constraint language
//!
//! A document gives the grid size on its first line and one condition per
//! following line. GridForge finds the grid with the smallest cell sum that
//! satisfies every condition at every cell.
//!
//! # Example
//!
//! ```rust
//! use gridforge::prelude::*;
//!
//! let config = GridForgeConfig::default();
//! let outcome = solve_str("2 , 2 ;\nA[i][j] >= 1 ;\nA[0][0] = 5 ;\n", &config).unwrap();
//! assert_eq!(outcome, GridOutcome::Solved(vec![vec![5, 1], vec![1, 1]]));
//! ```

mod error;
mod pipeline;

pub use error::{GridForgeError, Result};
pub use pipeline::{parse_file, solve_document, solve_document_with, solve_file, solve_str};

// Front end
pub use gridforge_core::{Condition, Dimension, Document, DocumentError, Expression, Relation};

// Configuration
pub use gridforge_config::{ConfigError, GridForgeConfig};

// Solving
pub use gridforge_solver::{
    GridOutcome, InstantiationError, SearchSolver, SolveStatus, Solver, SolverError,
};

pub mod prelude {
    pub use super::{parse_file, solve_document, solve_file, solve_str};
    pub use super::{Condition, Dimension, Document, Expression, Relation};
    pub use super::{GridForgeConfig, GridForgeError, GridOutcome};
    pub use super::{SearchSolver, Solver};
}
