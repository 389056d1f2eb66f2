//! Test utilities for gridforge-solver
//!
//! [`RecordingSolver`] renders every term it is asked to build as text and
//! keeps a log of assertions, symbols and solve calls. It never searches:
//! `solve` returns a scripted status and `evaluate` reads scripted values.

use std::collections::HashMap;
use std::time::Duration;

use gridforge_core::Relation;

use crate::api::{SolveStatus, Solver};
use crate::error::SolverError;

/// An integer term: its rendering plus its value when it is a literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedInt {
    pub text: String,
    pub value: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedGrid {
    pub rows: usize,
    pub cols: usize,
}

#[derive(Debug, Clone)]
pub struct RecordingSolver {
    pub grids: Vec<RecordedGrid>,
    pub assertions: Vec<String>,
    /// Every `symbol` call, in order, repeats included.
    pub symbol_calls: Vec<String>,
    pub objective: Option<String>,
    pub solve_calls: Vec<Duration>,
    /// Status every `solve` call returns.
    pub status: SolveStatus,
    /// Values `evaluate` returns, keyed by (row, col).
    pub values: HashMap<(usize, usize), i64>,
}

impl RecordingSolver {
    pub fn new() -> Self {
        Self::with_status(SolveStatus::Unsat)
    }

    pub fn with_status(status: SolveStatus) -> Self {
        Self {
            grids: Vec::new(),
            assertions: Vec::new(),
            symbol_calls: Vec::new(),
            objective: None,
            solve_calls: Vec::new(),
            status,
            values: HashMap::new(),
        }
    }

    /// Scripts a `Sat` answer with the given grid.
    pub fn answering(rows: &[&[i64]]) -> Self {
        let mut solver = Self::with_status(SolveStatus::Sat);
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                solver.values.insert((r, c), *value);
            }
        }
        solver
    }

    fn binary(left: RecordedInt, op: &str, right: RecordedInt, value: Option<i64>) -> RecordedInt {
        RecordedInt {
            text: format!("({} {op} {})", left.text, right.text),
            value,
        }
    }
}

impl Default for RecordingSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver for RecordingSolver {
    type Grid = RecordedGrid;
    type Int = RecordedInt;
    type Bool = String;

    fn declare_grid(&mut self, rows: usize, cols: usize) -> Result<RecordedGrid, SolverError> {
        let grid = RecordedGrid { rows, cols };
        self.grids.push(grid);
        Ok(grid)
    }

    fn cell(
        &mut self,
        grid: &RecordedGrid,
        row: RecordedInt,
        col: RecordedInt,
    ) -> Result<RecordedInt, SolverError> {
        if let (Some(r), Some(c)) = (row.value, col.value) {
            let inside = usize::try_from(r).is_ok_and(|r| r < grid.rows)
                && usize::try_from(c).is_ok_and(|c| c < grid.cols);
            if !inside {
                return Err(SolverError::CellOutOfRange {
                    row: r,
                    col: c,
                    rows: grid.rows,
                    cols: grid.cols,
                });
            }
        }
        Ok(RecordedInt {
            text: format!("A[{}][{}]", row.text, col.text),
            value: None,
        })
    }

    fn int_literal(&mut self, value: i64) -> RecordedInt {
        RecordedInt {
            text: value.to_string(),
            value: Some(value),
        }
    }

    fn symbol(&mut self, name: &str) -> RecordedInt {
        self.symbol_calls.push(name.to_string());
        RecordedInt {
            text: name.to_string(),
            value: None,
        }
    }

    fn add(&mut self, left: RecordedInt, right: RecordedInt) -> RecordedInt {
        let value = left.value.zip(right.value).and_then(|(l, r)| l.checked_add(r));
        Self::binary(left, "+", right, value)
    }

    fn sub(&mut self, left: RecordedInt, right: RecordedInt) -> RecordedInt {
        let value = left.value.zip(right.value).and_then(|(l, r)| l.checked_sub(r));
        Self::binary(left, "-", right, value)
    }

    fn mul(&mut self, left: RecordedInt, right: RecordedInt) -> RecordedInt {
        let value = left.value.zip(right.value).and_then(|(l, r)| l.checked_mul(r));
        Self::binary(left, "*", right, value)
    }

    fn compare(&mut self, relation: Relation, left: RecordedInt, right: RecordedInt) -> String {
        format!("{} {relation} {}", left.text, right.text)
    }

    fn assert(&mut self, condition: String) {
        self.assertions.push(condition);
    }

    fn minimize(&mut self, objective: RecordedInt) {
        self.objective = Some(objective.text);
    }

    fn solve(&mut self, timeout: Duration) -> SolveStatus {
        self.solve_calls.push(timeout);
        self.status
    }

    fn evaluate(&self, grid: &RecordedGrid, row: usize, col: usize) -> Option<i64> {
        if self.status != SolveStatus::Sat || row >= grid.rows || col >= grid.cols {
            return None;
        }
        self.values.get(&(row, col)).copied()
    }
}
