//! Error types for instantiation and solving

use thiserror::Error;

/// Errors raised by a [`Solver`](crate::Solver) while building terms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    #[error("Cell A[{row}][{col}] is outside the {rows}x{cols} grid")]
    CellOutOfRange {
        row: i64,
        col: i64,
        rows: usize,
        cols: usize,
    },

    #[error("A {rows}x{cols} grid has too many cells")]
    GridTooLarge { rows: usize, cols: usize },

    #[error("Grid was not declared by this solver")]
    UnknownGrid,
}

/// A condition that could not be turned into solver assertions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstantiationError {
    /// The solver rejected a term built for condition `index` (0-based, in
    /// document order) while `i = row` and `j = col`.
    #[error("Condition {index} `{condition}` at i = {row}, j = {col}: {source}")]
    Rejected {
        index: usize,
        condition: String,
        row: usize,
        col: usize,
        source: SolverError,
    },

    /// The solver could not declare the grid.
    #[error("Grid rejected: {0}")]
    Grid(#[source] SolverError),

    /// The solver rejected one of its own cells while building the objective.
    #[error("Objective rejected: {0}")]
    Objective(#[source] SolverError),
}

/// Result type alias for instantiation
pub type Result<T> = std::result::Result<T, InstantiationError>;
