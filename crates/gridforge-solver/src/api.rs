//! The capability the instantiation generator drives.
//!
//! Any backend able to build integer terms over a grid of unknowns, assert
//! relations between them and minimise one objective can implement
//! [`Solver`]. The crate ships [`SearchSolver`](crate::SearchSolver) as its
//! reference backend.

use std::fmt;
use std::time::Duration;

use gridforge_core::Relation;

use crate::error::SolverError;

/// Result of a single [`Solver::solve`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveStatus {
    /// A model was found; [`Solver::evaluate`] reads it.
    Sat,
    /// No model exists.
    Unsat,
    /// The solver gave up before deciding.
    Unknown,
}

impl SolveStatus {
    pub fn is_sat(self) -> bool {
        self == SolveStatus::Sat
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Sat => write!(f, "sat"),
            SolveStatus::Unsat => write!(f, "unsat"),
            SolveStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// An integer constraint backend.
///
/// Terms are opaque handles owned by the backend. A backend value is used
/// for one problem: declare, assert, minimise, solve once, then evaluate.
pub trait Solver {
    /// Handle to a declared grid of integer unknowns.
    type Grid: Clone;
    /// Handle to an integer-valued term.
    type Int: Clone;
    /// Handle to a boolean-valued term.
    type Bool;

    /// Declares a fresh `rows` x `cols` grid of integer unknowns.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::GridTooLarge`] when the backend cannot hold
    /// that many cells.
    fn declare_grid(&mut self, rows: usize, cols: usize) -> Result<Self::Grid, SolverError>;

    /// The cell of `grid` at (`row`, `col`).
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::CellOutOfRange`] when the indices are known to
    /// lie outside the grid, and [`SolverError::UnknownGrid`] when `grid`
    /// was not declared by this backend. Indices are never clamped.
    fn cell(
        &mut self,
        grid: &Self::Grid,
        row: Self::Int,
        col: Self::Int,
    ) -> Result<Self::Int, SolverError>;

    fn int_literal(&mut self, value: i64) -> Self::Int;

    /// A free integer unknown. The same name always yields the same unknown.
    fn symbol(&mut self, name: &str) -> Self::Int;

    fn add(&mut self, left: Self::Int, right: Self::Int) -> Self::Int;

    fn sub(&mut self, left: Self::Int, right: Self::Int) -> Self::Int;

    fn mul(&mut self, left: Self::Int, right: Self::Int) -> Self::Int;

    /// `left <relation> right` as a boolean term.
    fn compare(&mut self, relation: Relation, left: Self::Int, right: Self::Int) -> Self::Bool;

    /// Adds a hard constraint.
    fn assert(&mut self, condition: Self::Bool);

    /// Sets the term to minimise. A later call replaces the earlier one.
    fn minimize(&mut self, objective: Self::Int);

    /// Runs the backend once, giving up after `timeout`.
    fn solve(&mut self, timeout: Duration) -> SolveStatus;

    /// Value of a grid cell in the model found by the last successful
    /// [`solve`](Solver::solve), or `None` if there is no model or the cell
    /// is outside the grid.
    fn evaluate(&self, grid: &Self::Grid, row: usize, col: usize) -> Option<i64>;
}
