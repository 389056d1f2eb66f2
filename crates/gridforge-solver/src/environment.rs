//! Identifier bindings used while instantiating a condition.

use std::collections::HashMap;

use crate::api::Solver;

/// What each free identifier means for the current instantiation.
///
/// `i` and `j` are the row and column being instantiated and lower to
/// literals. Every other name lowers to a solver symbol that is created on
/// first use and then shared by every later instantiation.
#[derive(Debug, Clone)]
pub struct Bindings<I> {
    row: usize,
    col: usize,
    symbols: HashMap<String, I>,
}

impl<I: Clone> Bindings<I> {
    pub fn new() -> Self {
        Self {
            row: 0,
            col: 0,
            symbols: HashMap::new(),
        }
    }

    /// Moves to the cell (`row`, `col`). Symbols are kept.
    pub fn at(&mut self, row: usize, col: usize) {
        self.row = row;
        self.col = col;
    }

    /// Lowers the identifier `name` to a solver term.
    pub fn resolve<S>(&mut self, solver: &mut S, name: &str) -> I
    where
        S: Solver<Int = I>,
    {
        match name {
            "i" => solver.int_literal(index_value(self.row)),
            "j" => solver.int_literal(index_value(self.col)),
            _ => self
                .symbols
                .entry(name.to_string())
                .or_insert_with(|| solver.symbol(name))
                .clone(),
        }
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }
}

impl<I: Clone> Default for Bindings<I> {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn index_value(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}
