//! Expands parsed conditions into solver assertions, one per grid cell.
//!
//! Every condition is instantiated at every cell of the grid with `i` and `j`
//! bound to the row and column, so a document with `N` conditions over an
//! `R` x `C` grid issues exactly `N * R * C` assertions. Conditions that do
//! not mention `i` or `j` are still replicated; the duplicates are harmless.
//!
//! The objective is always the sum of all cells.

use std::time::{Duration, Instant};

use gridforge_core::{Condition, Dimension, Expression};
use tracing::{debug, info};

use crate::api::{SolveStatus, Solver};
use crate::environment::{index_value, Bindings};
use crate::error::{InstantiationError, Result, SolverError};

#[cfg(test)]
#[path = "instantiate_tests.rs"]
mod tests;

/// Final answer for a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridOutcome {
    /// Cell values, row by row.
    Solved(Vec<Vec<i64>>),
    /// The solver reported `Unsat` or `Unknown`.
    NoSolution,
}

impl GridOutcome {
    pub fn grid(&self) -> Option<&[Vec<i64>]> {
        match self {
            GridOutcome::Solved(rows) => Some(rows),
            GridOutcome::NoSolution => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, GridOutcome::Solved(_))
    }
}

/// A problem loaded into a solver and ready to run.
#[derive(Debug, Clone)]
pub struct Instantiation<G> {
    pub grid: G,
    pub dimension: Dimension,
    /// Number of assertions issued.
    pub assertion_count: usize,
    /// Number of distinct free symbols created.
    pub symbol_count: usize,
}

/// Declares the grid, asserts every condition at every cell and sets the
/// objective.
///
/// # Errors
///
/// Fails when the solver cannot declare the grid, or on the first cell
/// reference it rejects. Assertions issued before the failure stay in the
/// solver; the caller should discard it.
pub fn instantiate<S: Solver>(
    solver: &mut S,
    dimension: Dimension,
    conditions: &[Condition],
) -> Result<Instantiation<S::Grid>> {
    let Dimension { rows, cols } = dimension;

    info!(
        event = "instantiate_start",
        rows,
        cols,
        condition_count = conditions.len(),
    );

    let grid = solver
        .declare_grid(rows, cols)
        .map_err(InstantiationError::Grid)?;
    let mut bindings = Bindings::new();
    let mut assertion_count = 0;

    for (index, condition) in conditions.iter().enumerate() {
        for row in 0..rows {
            for col in 0..cols {
                bindings.at(row, col);
                let assertion = lower_condition(solver, &grid, &mut bindings, condition)
                    .map_err(|source| InstantiationError::Rejected {
                        index,
                        condition: condition.to_string(),
                        row,
                        col,
                        source,
                    })?;
                solver.assert(assertion);
                assertion_count += 1;
            }
        }
    }

    let objective = cell_sum(solver, &grid, dimension)?;
    solver.minimize(objective);

    info!(
        event = "instantiate_end",
        assertion_count,
        symbol_count = bindings.symbol_count(),
    );

    Ok(Instantiation {
        grid,
        dimension,
        assertion_count,
        symbol_count: bindings.symbol_count(),
    })
}

/// Runs the solver once and reads back the whole grid.
///
/// Anything other than a complete model is reported as
/// [`GridOutcome::NoSolution`]; a partial grid is never returned.
pub fn solve_grid<S: Solver>(
    solver: &mut S,
    problem: &Instantiation<S::Grid>,
    timeout: Duration,
) -> GridOutcome {
    let Dimension { rows, cols } = problem.dimension;
    info!(
        event = "solve_start",
        rows,
        cols,
        assertion_count = problem.assertion_count,
        timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
    );

    let started = Instant::now();
    let status = solver.solve(timeout);

    let outcome = match status {
        SolveStatus::Sat => read_grid(solver, problem),
        SolveStatus::Unsat | SolveStatus::Unknown => GridOutcome::NoSolution,
    };

    info!(
        event = "solve_end",
        status = %status,
        solved = outcome.is_solved(),
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    );
    outcome
}

/// [`instantiate`] followed by [`solve_grid`].
pub fn generate<S: Solver>(
    solver: &mut S,
    dimension: Dimension,
    conditions: &[Condition],
    timeout: Duration,
) -> Result<GridOutcome> {
    let problem = instantiate(solver, dimension, conditions)?;
    Ok(solve_grid(solver, &problem, timeout))
}

fn read_grid<S: Solver>(solver: &S, problem: &Instantiation<S::Grid>) -> GridOutcome {
    let Dimension { rows, cols } = problem.dimension;
    let grid: Option<Vec<Vec<i64>>> = (0..rows)
        .map(|row| {
            (0..cols)
                .map(|col| solver.evaluate(&problem.grid, row, col))
                .collect()
        })
        .collect();

    match grid {
        Some(values) => GridOutcome::Solved(values),
        None => {
            debug!(event = "model_incomplete", rows, cols);
            GridOutcome::NoSolution
        }
    }
}

fn lower_condition<S: Solver>(
    solver: &mut S,
    grid: &S::Grid,
    bindings: &mut Bindings<S::Int>,
    condition: &Condition,
) -> std::result::Result<S::Bool, SolverError> {
    let left = lower(solver, grid, bindings, &condition.left)?;
    let right = lower(solver, grid, bindings, &condition.right)?;
    Ok(solver.compare(condition.relation, left, right))
}

/// Lowers an expression tree to a solver term under `bindings`.
pub fn lower<S: Solver>(
    solver: &mut S,
    grid: &S::Grid,
    bindings: &mut Bindings<S::Int>,
    expr: &Expression,
) -> std::result::Result<S::Int, SolverError> {
    Ok(match expr {
        Expression::Constant(value) => solver.int_literal(*value),
        Expression::Variable(name) => bindings.resolve(solver, name),
        Expression::MatrixRef(row, col) => {
            let row = lower(solver, grid, bindings, row)?;
            let col = lower(solver, grid, bindings, col)?;
            solver.cell(grid, row, col)?
        }
        Expression::Add(l, r) => {
            let l = lower(solver, grid, bindings, l)?;
            let r = lower(solver, grid, bindings, r)?;
            solver.add(l, r)
        }
        Expression::Sub(l, r) => {
            let l = lower(solver, grid, bindings, l)?;
            let r = lower(solver, grid, bindings, r)?;
            solver.sub(l, r)
        }
        Expression::Mul(l, r) => {
            let l = lower(solver, grid, bindings, l)?;
            let r = lower(solver, grid, bindings, r)?;
            solver.mul(l, r)
        }
        Expression::Paren(inner) => lower(solver, grid, bindings, inner)?,
    })
}

fn cell_sum<S: Solver>(solver: &mut S, grid: &S::Grid, dimension: Dimension) -> Result<S::Int> {
    let mut sum = solver.int_literal(0);
    for row in 0..dimension.rows {
        for col in 0..dimension.cols {
            let cell = cell_at(solver, grid, row, col).map_err(InstantiationError::Objective)?;
            sum = solver.add(sum, cell);
        }
    }
    Ok(sum)
}

fn cell_at<S: Solver>(
    solver: &mut S,
    grid: &S::Grid,
    row: usize,
    col: usize,
) -> std::result::Result<S::Int, SolverError> {
    let row = solver.int_literal(index_value(row));
    let col = solver.int_literal(index_value(col));
    solver.cell(grid, row, col)
}
