//! Bounds propagation over the asserted comparisons.
//!
//! Each comparison is revised by evaluating both sides over the current
//! domains and projecting the relation back onto the variables they read.
//! Revision is sound but incomplete: products of two unknowns and cells
//! with unresolved indices are checked, never narrowed.
//!
//! Every domain change is written to a [`Trail`] so the search can undo it
//! on backtrack instead of copying the domains at each level.

use std::collections::VecDeque;
use std::time::Instant;

use gridforge_core::Relation;
use smallvec::SmallVec;

use super::domain::Interval;
use super::term::{BinaryOp, GridLayout, Term, TermId, TermStore, VarId};

/// The current domains admit no solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Conflict;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Comparison {
    pub relation: Relation,
    pub left: TermId,
    pub right: TermId,
}

type Changed = SmallVec<[VarId; 8]>;

/// Revisions between two deadline checks.
const REVISIONS_PER_CLOCK_CHECK: u32 = 4096;

/// Previous domains of every variable narrowed since some mark.
#[derive(Debug, Default)]
pub(crate) struct Trail {
    entries: Vec<(VarId, Interval)>,
}

impl Trail {
    pub(crate) fn mark(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn record(&mut self, var: VarId, previous: Interval) {
        self.entries.push((var, previous));
    }

    /// Restores every domain changed after `mark`.
    pub(crate) fn undo(&mut self, domains: &mut [Interval], mark: usize) {
        while self.entries.len() > mark {
            if let Some((var, previous)) = self.entries.pop() {
                domains[var.0] = previous;
            }
        }
    }
}

/// Read-only view of the model used while searching.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Model<'a> {
    pub terms: &'a TermStore,
    pub grids: &'a [GridLayout],
    pub comparisons: &'a [Comparison],
    /// For each variable, the comparisons that read it.
    pub watchers: &'a [SmallVec<[usize; 4]>],
    /// Propagation gives up with a [`Conflict`] once this has passed.
    pub deadline: Option<Instant>,
}

impl Model<'_> {
    /// Range of values `id` can take under `domains`.
    pub(crate) fn forward(&self, domains: &[Interval], id: TermId) -> Result<Interval, Conflict> {
        match self.terms.get(id) {
            Term::Const(value) => Ok(Interval::point(value)),
            Term::Var(var) => Ok(domains[var.0]),
            Term::Cell { grid, row, col } => {
                let layout = &self.grids[grid.0];
                let rows = self.forward(domains, row)?;
                let cols = self.forward(domains, col)?;
                if let (Some(r), Some(c)) = (rows.as_point(), cols.as_point()) {
                    let var = layout.var_at(r, c).ok_or(Conflict)?;
                    return Ok(domains[var.0]);
                }
                cell_hull(layout, domains, rows, cols)
            }
            Term::Binary(op, left, right) => {
                let left = self.forward(domains, left)?;
                let right = self.forward(domains, right)?;
                Ok(op.apply_interval(left, right))
            }
        }
    }

    /// Runs revisions until no domain changes, starting from `seeds`.
    ///
    /// Also fails once the deadline has passed; callers tell the two apart
    /// by looking at the clock.
    pub(crate) fn propagate(
        &self,
        domains: &mut [Interval],
        trail: &mut Trail,
        seeds: impl IntoIterator<Item = usize>,
    ) -> Result<(), Conflict> {
        let mut queued = vec![false; self.comparisons.len()];
        let mut queue = VecDeque::new();
        for index in seeds {
            if !queued[index] {
                queued[index] = true;
                queue.push_back(index);
            }
        }

        let mut changed = Changed::new();
        let mut revisions = 0u32;
        while let Some(index) = queue.pop_front() {
            revisions += 1;
            if revisions % REVISIONS_PER_CLOCK_CHECK == 0 && self.past_deadline() {
                return Err(Conflict);
            }
            queued[index] = false;
            changed.clear();
            let mut scope = Scope {
                changed: &mut changed,
                trail: &mut *trail,
            };
            self.revise(domains, &self.comparisons[index], &mut scope)?;
            for var in changed.drain(..) {
                for &watcher in &self.watchers[var.0] {
                    if !queued[watcher] {
                        queued[watcher] = true;
                        queue.push_back(watcher);
                    }
                }
            }
        }
        Ok(())
    }

    fn past_deadline(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Returns true if every comparison holds exactly. All variables read by
    /// the comparisons must be fixed.
    pub(crate) fn satisfied(&self, domains: &[Interval]) -> bool {
        self.comparisons.iter().all(|cmp| {
            let left = self.forward(domains, cmp.left).ok().and_then(Interval::as_point);
            let right = self.forward(domains, cmp.right).ok().and_then(Interval::as_point);
            match (left, right) {
                (Some(l), Some(r)) => cmp.relation.holds(l, r),
                _ => false,
            }
        })
    }

    fn revise(
        &self,
        domains: &mut [Interval],
        cmp: &Comparison,
        scope: &mut Scope<'_>,
    ) -> Result<(), Conflict> {
        let left = self.forward(domains, cmp.left)?;
        let right = self.forward(domains, cmp.right)?;

        let (left_target, right_target) = match cmp.relation {
            Relation::Eq => (right, left),
            Relation::Le => (Interval::at_most(right.hi), Interval::at_least(left.lo)),
            Relation::Lt => (
                Interval::at_most(right.hi - 1),
                Interval::at_least(left.lo + 1),
            ),
            Relation::Ge => (Interval::at_least(right.lo), Interval::at_most(left.hi)),
            Relation::Gt => (
                Interval::at_least(right.lo + 1),
                Interval::at_most(left.hi - 1),
            ),
        };

        self.narrow(domains, cmp.left, left_target, scope)?;
        self.narrow(domains, cmp.right, right_target, scope)
    }

    /// Shrinks the variables under `id` so that `id` can only take values in
    /// `target`.
    fn narrow(
        &self,
        domains: &mut [Interval],
        id: TermId,
        target: Interval,
        scope: &mut Scope<'_>,
    ) -> Result<(), Conflict> {
        match self.terms.get(id) {
            Term::Const(value) => {
                if target.contains(i128::from(value)) {
                    Ok(())
                } else {
                    Err(Conflict)
                }
            }
            Term::Var(var) => scope.narrow_var(domains, var, target),
            Term::Cell { grid, row, col } => {
                let rows = self.forward(domains, row)?;
                let cols = self.forward(domains, col)?;
                if let (Some(r), Some(c)) = (rows.as_point(), cols.as_point()) {
                    let var = self.grids[grid.0].var_at(r, c).ok_or(Conflict)?;
                    return scope.narrow_var(domains, var, target);
                }
                let hull = cell_hull(&self.grids[grid.0], domains, rows, cols)?;
                if hull.intersect(target).is_empty() {
                    Err(Conflict)
                } else {
                    Ok(())
                }
            }
            Term::Binary(op, left, right) => {
                let l = self.forward(domains, left)?;
                let r = self.forward(domains, right)?;
                if op.apply_interval(l, r).intersect(target).is_empty() {
                    return Err(Conflict);
                }
                match op {
                    BinaryOp::Add => {
                        self.narrow(domains, left, target.sub(r), scope)?;
                        let l = self.forward(domains, left)?;
                        self.narrow(domains, right, target.sub(l), scope)
                    }
                    BinaryOp::Sub => {
                        self.narrow(domains, left, target.add(r), scope)?;
                        let l = self.forward(domains, left)?;
                        self.narrow(domains, right, l.sub(target), scope)
                    }
                    BinaryOp::Mul => {
                        if let Some(factor) = r.as_point().filter(|&f| f != 0) {
                            self.narrow(domains, left, target.div_by(factor), scope)?;
                        }
                        if let Some(factor) = l.as_point().filter(|&f| f != 0) {
                            self.narrow(domains, right, target.div_by(factor), scope)?;
                        }
                        Ok(())
                    }
                }
            }
        }
    }
}

/// Where one revision reports its domain changes.
struct Scope<'t> {
    changed: &'t mut Changed,
    trail: &'t mut Trail,
}

impl Scope<'_> {
    fn narrow_var(
        &mut self,
        domains: &mut [Interval],
        var: VarId,
        target: Interval,
    ) -> Result<(), Conflict> {
        let current = domains[var.0];
        let next = current.intersect(target);
        if next.is_empty() {
            return Err(Conflict);
        }
        if next != current {
            self.trail.record(var, current);
            domains[var.0] = next;
            if !self.changed.contains(&var) {
                self.changed.push(var);
            }
        }
        Ok(())
    }
}

/// Hull of every in-range cell whose row lies in `rows` and column in `cols`.
fn cell_hull(
    layout: &GridLayout,
    domains: &[Interval],
    rows: Interval,
    cols: Interval,
) -> Result<Interval, Conflict> {
    let row_span = index_span(rows, layout.rows).ok_or(Conflict)?;
    let col_span = index_span(cols, layout.cols).ok_or(Conflict)?;

    let mut hull: Option<Interval> = None;
    for row in row_span {
        for col in col_span.clone() {
            if let Some(var) = layout.var_at(row, col) {
                let domain = domains[var.0];
                hull = Some(hull.map_or(domain, |h| h.hull(domain)));
            }
        }
    }
    hull.ok_or(Conflict)
}

fn index_span(range: Interval, len: usize) -> Option<std::ops::RangeInclusive<i128>> {
    let last = i128::try_from(len).ok()? - 1;
    let lo = range.lo.max(0);
    let hi = range.hi.min(last);
    (lo <= hi).then_some(lo..=hi)
}
