//! Term storage for the search backend.
//!
//! Terms live in an append-only arena and are referred to by index. Cells
//! with literal indices resolve to their variable when built, so a
//! [`Term::Cell`] only exists for indices that depend on an unknown.

use smallvec::SmallVec;

use super::domain::Interval;

/// Handle to an integer term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TermId(pub(crate) usize);

/// Handle to a boolean term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PredicateId(pub(crate) usize);

/// Handle to a declared grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct VarId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
}

impl BinaryOp {
    /// Exact result, or `None` on overflow.
    pub(crate) fn apply(self, left: i64, right: i64) -> Option<i64> {
        match self {
            BinaryOp::Add => left.checked_add(right),
            BinaryOp::Sub => left.checked_sub(right),
            BinaryOp::Mul => left.checked_mul(right),
        }
    }

    pub(crate) fn apply_interval(self, left: Interval, right: Interval) -> Interval {
        match self {
            BinaryOp::Add => left.add(right),
            BinaryOp::Sub => left.sub(right),
            BinaryOp::Mul => left.mul(right),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Term {
    Const(i64),
    Var(VarId),
    Cell { grid: GridId, row: TermId, col: TermId },
    Binary(BinaryOp, TermId, TermId),
}

/// Rows, columns and the first variable of a declared grid. Cells are laid
/// out row-major from `first`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GridLayout {
    pub rows: usize,
    pub cols: usize,
    pub first: usize,
}

impl GridLayout {
    pub(crate) fn var_at(&self, row: i128, col: i128) -> Option<VarId> {
        let row = usize::try_from(row).ok().filter(|&r| r < self.rows)?;
        let col = usize::try_from(col).ok().filter(|&c| c < self.cols)?;
        Some(VarId(self.first + row * self.cols + col))
    }

    pub(crate) fn vars(&self) -> impl Iterator<Item = VarId> {
        let first = self.first;
        (first..first + self.rows * self.cols).map(VarId)
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct TermStore {
    terms: Vec<Term>,
}

impl TermStore {
    pub(crate) fn get(&self, id: TermId) -> Term {
        self.terms[id.0]
    }

    pub(crate) fn push(&mut self, term: Term) -> TermId {
        self.terms.push(term);
        TermId(self.terms.len() - 1)
    }

    pub(crate) fn constant(&self, id: TermId) -> Option<i64> {
        match self.get(id) {
            Term::Const(value) => Some(value),
            _ => None,
        }
    }

    /// Builds `left <op> right`, folding two literals when the result fits.
    pub(crate) fn binary(&mut self, op: BinaryOp, left: TermId, right: TermId) -> TermId {
        let folded = self
            .constant(left)
            .zip(self.constant(right))
            .and_then(|(l, r)| op.apply(l, r));
        match folded {
            Some(value) => self.push(Term::Const(value)),
            None => self.push(Term::Binary(op, left, right)),
        }
    }

    /// Leaves of the sums and differences rooted at `id`, each flagged
    /// with whether it is subtracted. Walks with an explicit stack, since an
    /// objective over a large grid is one very deep chain of additions.
    pub(crate) fn addends(&self, id: TermId) -> Vec<(bool, TermId)> {
        let mut leaves = Vec::new();
        let mut pending = vec![(false, id)];
        while let Some((negated, id)) = pending.pop() {
            match self.get(id) {
                Term::Binary(BinaryOp::Add, left, right) => {
                    pending.push((negated, right));
                    pending.push((negated, left));
                }
                Term::Binary(BinaryOp::Sub, left, right) => {
                    pending.push((!negated, right));
                    pending.push((negated, left));
                }
                _ => leaves.push((negated, id)),
            }
        }
        leaves
    }

    /// Every variable `id` may read. A symbolic cell may read any cell of
    /// its grid.
    pub(crate) fn collect_vars(
        &self,
        id: TermId,
        grids: &[GridLayout],
        out: &mut SmallVec<[VarId; 8]>,
    ) {
        match self.get(id) {
            Term::Const(_) => {}
            Term::Var(var) => {
                if !out.contains(&var) {
                    out.push(var);
                }
            }
            Term::Cell { grid, row, col } => {
                for var in grids[grid.0].vars() {
                    if !out.contains(&var) {
                        out.push(var);
                    }
                }
                self.collect_vars(row, grids, out);
                self.collect_vars(col, grids, out);
            }
            Term::Binary(_, left, right) => {
                self.collect_vars(left, grids, out);
                self.collect_vars(right, grids, out);
            }
        }
    }
}
