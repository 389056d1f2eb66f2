//! Reference [`Solver`] backend: exact branch-and-bound.
//!
//! Every cell and symbol starts out unbounded and the asserted comparisons
//! are propagated to a fixpoint. A variable whose domain is still open on
//! one side is then closed with the configured box `[domain_min,
//! domain_max]`; when the finite side already lies past the box, the
//! domain is given the box's width from that side instead.
//!
//! The search then assigns symbols first, then cells in row-major order,
//! trying values in ascending order. After each assignment bounds
//! propagation narrows the remaining domains; a branch is pruned when
//! propagation fails or when the objective's lower bound cannot beat the
//! best grid found so far. Choices live on an explicit stack and domain
//! changes are undone from a trail, so the depth of the search never
//! touches the call stack.
//!
//! # Outcomes
//!
//! - the search space is exhausted with a solution: [`SolveStatus::Sat`],
//!   and the solution is minimal within the searched domains
//! - exhausted without one, and no domain was closed by the box:
//!   [`SolveStatus::Unsat`]
//! - exhausted without one after the box closed some domain, or the time
//!   or node limit is hit first: [`SolveStatus::Unknown`]
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use gridforge_core::{Dimension, Relation};
//! use gridforge_solver::{SearchConfig, SearchSolver, SolveStatus, Solver};
//!
//! let mut solver = SearchSolver::new(SearchConfig::default().with_domain(0, 9));
//! let grid = solver.declare_grid(1, 2).unwrap();
//! let zero = solver.int_literal(0);
//! let one = solver.int_literal(1);
//! let a = solver.cell(&grid, zero, zero).unwrap();
//! let b = solver.cell(&grid, zero, one).unwrap();
//! let gap = solver.compare(Relation::Lt, a, b);
//! solver.assert(gap);
//! let sum = solver.add(a, b);
//! solver.minimize(sum);
//!
//! assert_eq!(solver.solve(Duration::from_secs(1)), SolveStatus::Sat);
//! assert_eq!(solver.evaluate(&grid, 0, 1), Some(1));
//! ```

mod domain;
mod propagate;
mod term;


use std::collections::HashMap;
use std::time::{Duration, Instant};

use gridforge_config::SolverSettings;
use gridforge_core::{Dimension, Relation};
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use crate::api::{SolveStatus, Solver};
use crate::error::SolverError;

use domain::Interval;
use propagate::{Comparison, Conflict, Model, Trail};
use term::{BinaryOp, GridLayout, Term, TermStore, VarId};

pub use term::{GridId, PredicateId, TermId};

/// Search box and limits for [`SearchSolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Closes domains that propagation leaves unbounded below.
    pub domain_min: i64,
    /// Closes domains that propagation leaves unbounded above.
    pub domain_max: i64,
    /// Maximum number of search nodes (None = unlimited).
    pub node_limit: Option<u64>,
}

impl SearchConfig {
    pub fn with_domain(mut self, min: i64, max: i64) -> Self {
        self.domain_min = min;
        self.domain_max = max;
        self
    }

    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::from(&SolverSettings::default())
    }
}

impl From<&SolverSettings> for SearchConfig {
    fn from(settings: &SolverSettings) -> Self {
        Self {
            domain_min: settings.domain_min,
            domain_max: settings.domain_max,
            node_limit: settings.node_limit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VarKind {
    Symbol,
    Cell,
}

/// Exact branch-and-bound [`Solver`].
#[derive(Debug, Clone)]
pub struct SearchSolver {
    config: SearchConfig,
    terms: TermStore,
    /// Kind of each variable, indexed by `VarId`.
    kinds: Vec<VarKind>,
    /// The `Term::Var` term of each variable.
    var_terms: Vec<TermId>,
    grids: Vec<GridLayout>,
    symbols: HashMap<String, VarId>,
    predicates: Vec<Comparison>,
    asserted: Vec<PredicateId>,
    objective: Option<TermId>,
    solution: Option<Vec<i64>>,
    nodes_explored: u64,
}

impl SearchSolver {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            terms: TermStore::default(),
            kinds: Vec::new(),
            var_terms: Vec::new(),
            grids: Vec::new(),
            symbols: HashMap::new(),
            predicates: Vec::new(),
            asserted: Vec::new(),
            objective: None,
            solution: None,
            nodes_explored: 0,
        }
    }

    pub fn from_settings(settings: &SolverSettings) -> Self {
        Self::new(SearchConfig::from(settings))
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Value of the symbol `name` in the last model, if any.
    pub fn symbol_value(&self, name: &str) -> Option<i64> {
        let var = self.symbols.get(name)?;
        self.solution.as_ref()?.get(var.0).copied()
    }

    /// Number of search nodes visited by the last [`solve`](Solver::solve).
    pub fn nodes_explored(&self) -> u64 {
        self.nodes_explored
    }

    pub fn assertion_count(&self) -> usize {
        self.asserted.len()
    }

    fn new_var(&mut self, kind: VarKind) -> VarId {
        let var = VarId(self.kinds.len());
        self.kinds.push(kind);
        let term = self.terms.push(Term::Var(var));
        self.var_terms.push(term);
        var
    }

    /// Closes every open side with the box. Returns true if any domain was
    /// closed.
    fn close_open_domains(&self, domains: &mut [Interval]) -> bool {
        let min = i128::from(self.config.domain_min);
        let max = i128::from(self.config.domain_max);
        let width = max - min;

        let mut closed = false;
        for domain in domains.iter_mut() {
            let mut lo = domain.lo;
            let mut hi = domain.hi;
            if !domain.has_lower_bound() {
                lo = if hi >= min { min } else { hi - width };
            }
            if !domain.has_upper_bound() {
                hi = if lo <= max { max } else { lo + width };
            }
            let next = Interval::new(lo, hi);
            if next != *domain {
                *domain = next;
                closed = true;
            }
        }
        closed
    }

    fn watchers(&self, comparisons: &[Comparison]) -> Vec<SmallVec<[usize; 4]>> {
        let mut watchers = vec![SmallVec::new(); self.kinds.len()];
        let mut vars = SmallVec::<[VarId; 8]>::new();
        for (index, cmp) in comparisons.iter().enumerate() {
            vars.clear();
            self.terms.collect_vars(cmp.left, &self.grids, &mut vars);
            self.terms.collect_vars(cmp.right, &self.grids, &mut vars);
            for var in &vars {
                watchers[var.0].push(index);
            }
        }
        watchers
    }

    /// Symbols first, then cells in declaration order.
    fn branching_order(&self) -> Vec<VarId> {
        let of_kind = |kind: VarKind| {
            self.kinds
                .iter()
                .enumerate()
                .filter(move |(_, k)| **k == kind)
                .map(|(index, _)| VarId(index))
        };
        of_kind(VarKind::Symbol).chain(of_kind(VarKind::Cell)).collect()
    }
}

impl Default for SearchSolver {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl Solver for SearchSolver {
    type Grid = GridId;
    type Int = TermId;
    type Bool = PredicateId;

    fn declare_grid(&mut self, rows: usize, cols: usize) -> Result<GridId, SolverError> {
        let too_large = SolverError::GridTooLarge { rows, cols };
        let count = Dimension::new(rows, cols)
            .cell_count()
            .ok_or_else(|| too_large.clone())?;
        let first = self.kinds.len();
        first.checked_add(count).ok_or_else(|| too_large.clone())?;
        self.kinds
            .try_reserve(count)
            .and_then(|()| self.var_terms.try_reserve(count))
            .map_err(|_| too_large)?;

        for _ in 0..count {
            self.new_var(VarKind::Cell);
        }
        self.grids.push(GridLayout { rows, cols, first });
        Ok(GridId(self.grids.len() - 1))
    }

    fn cell(&mut self, grid: &GridId, row: TermId, col: TermId) -> Result<TermId, SolverError> {
        let layout = self
            .grids
            .get(grid.0)
            .copied()
            .ok_or(SolverError::UnknownGrid)?;

        match (self.terms.constant(row), self.terms.constant(col)) {
            (Some(r), Some(c)) => layout
                .var_at(i128::from(r), i128::from(c))
                .map(|var| self.var_terms[var.0])
                .ok_or(SolverError::CellOutOfRange {
                    row: r,
                    col: c,
                    rows: layout.rows,
                    cols: layout.cols,
                }),
            _ => Ok(self.terms.push(Term::Cell {
                grid: *grid,
                row,
                col,
            })),
        }
    }

    fn int_literal(&mut self, value: i64) -> TermId {
        self.terms.push(Term::Const(value))
    }

    fn symbol(&mut self, name: &str) -> TermId {
        if let Some(var) = self.symbols.get(name) {
            return self.var_terms[var.0];
        }
        let var = self.new_var(VarKind::Symbol);
        self.symbols.insert(name.to_string(), var);
        self.var_terms[var.0]
    }

    fn add(&mut self, left: TermId, right: TermId) -> TermId {
        self.terms.binary(BinaryOp::Add, left, right)
    }

    fn sub(&mut self, left: TermId, right: TermId) -> TermId {
        self.terms.binary(BinaryOp::Sub, left, right)
    }

    fn mul(&mut self, left: TermId, right: TermId) -> TermId {
        self.terms.binary(BinaryOp::Mul, left, right)
    }

    fn compare(&mut self, relation: Relation, left: TermId, right: TermId) -> PredicateId {
        self.predicates.push(Comparison {
            relation,
            left,
            right,
        });
        PredicateId(self.predicates.len() - 1)
    }

    fn assert(&mut self, condition: PredicateId) {
        self.asserted.push(condition);
    }

    fn minimize(&mut self, objective: TermId) {
        self.objective = Some(objective);
    }

    fn solve(&mut self, timeout: Duration) -> SolveStatus {
        self.solution = None;
        self.nodes_explored = 0;
        let started = Instant::now();

        let comparisons: Vec<Comparison> = self
            .asserted
            .iter()
            .map(|id| self.predicates[id.0])
            .collect();
        let watchers = self.watchers(&comparisons);
        let order = self.branching_order();
        let objective = self
            .objective
            .map(|id| self.terms.addends(id))
            .unwrap_or_default();
        let model = Model {
            terms: &self.terms,
            grids: &self.grids,
            comparisons: &comparisons,
            watchers: &watchers,
            deadline: started.checked_add(timeout),
        };

        debug!(
            event = "search_start",
            variable_count = self.kinds.len(),
            comparison_count = comparisons.len(),
            domain_min = self.config.domain_min,
            domain_max = self.config.domain_max,
        );

        let mut domains = vec![Interval::unbounded(); self.kinds.len()];
        let mut root_trail = Trail::default();
        let all = 0..comparisons.len();
        if model.propagate(&mut domains, &mut root_trail, all.clone()).is_err() {
            return root_failure(started, timeout, false);
        }
        let boxed = self.close_open_domains(&mut domains);
        if boxed && model.propagate(&mut domains, &mut root_trail, all).is_err() {
            return root_failure(started, timeout, true);
        }

        let mut search = Search {
            model,
            order: &order,
            objective: &objective,
            started,
            time_limit: timeout,
            node_limit: self.config.node_limit,
            nodes: 0,
            best: None,
            stop: None,
        };
        search.explore(&mut domains);

        self.nodes_explored = search.nodes;
        if let Some(limit) = search.stop {
            info!(event = "search_timeout", limit, nodes = search.nodes);
            return SolveStatus::Unknown;
        }

        debug!(
            event = "search_exhausted",
            nodes = search.nodes,
            solved = search.best.is_some(),
            boxed,
        );
        match search.best {
            Some((_, best)) => {
                self.solution = best.iter().map(|d| i64::try_from(d.lo).ok()).collect();
                if self.solution.is_some() {
                    SolveStatus::Sat
                } else {
                    SolveStatus::Unknown
                }
            }
            None if boxed => {
                warn!(
                    event = "search_inconclusive",
                    domain_min = self.config.domain_min,
                    domain_max = self.config.domain_max,
                );
                SolveStatus::Unknown
            }
            None => SolveStatus::Unsat,
        }
    }

    fn evaluate(&self, grid: &GridId, row: usize, col: usize) -> Option<i64> {
        let layout = self.grids.get(grid.0)?;
        let var = layout.var_at(i128::try_from(row).ok()?, i128::try_from(col).ok()?)?;
        self.solution.as_ref()?.get(var.0).copied()
    }
}

/// Status for a conflict found before any branching.
fn root_failure(started: Instant, timeout: Duration, boxed: bool) -> SolveStatus {
    if started.elapsed() >= timeout {
        info!(event = "search_timeout", limit = "time", nodes = 0u64);
        return SolveStatus::Unknown;
    }
    debug!(event = "search_exhausted", nodes = 0u64, solved = false, boxed);
    if boxed {
        SolveStatus::Unknown
    } else {
        SolveStatus::Unsat
    }
}

/// An open decision: the values still to try for one variable.
#[derive(Debug, Clone, Copy)]
struct Choice {
    var: VarId,
    /// Index of `var` in the branching order.
    position: usize,
    next: i128,
    hi: i128,
    /// Trail length before the first value was tried.
    mark: usize,
}

/// State of one depth-first branch-and-bound run.
struct Search<'a> {
    model: Model<'a>,
    order: &'a [VarId],
    /// Signed leaves of the objective sum.
    objective: &'a [(bool, TermId)],
    started: Instant,
    time_limit: Duration,
    node_limit: Option<u64>,
    nodes: u64,
    /// Best objective value so far and the fixed domains that reach it.
    best: Option<(i128, Vec<Interval>)>,
    /// Name of the limit that stopped the search.
    stop: Option<&'static str>,
}

impl Search<'_> {
    fn explore(&mut self, domains: &mut [Interval]) {
        let mut trail = Trail::default();
        let mut stack: Vec<Choice> = Vec::new();
        self.visit(domains, &trail, &mut stack, 0);

        while let Some(choice) = stack.last_mut() {
            if self.stop.is_some() {
                return;
            }
            trail.undo(domains, choice.mark);
            if choice.next > choice.hi {
                stack.pop();
                continue;
            }
            let Choice {
                var,
                position,
                next: value,
                hi,
                ..
            } = *choice;
            choice.next += 1;

            trail.record(var, domains[var.0]);

            // Nothing in [value, hi] can beat the incumbent.
            domains[var.0] = Interval::new(value, hi);
            if self.cannot_improve(domains) {
                stack.pop();
                continue;
            }

            domains[var.0] = Interval::new(value, value);
            let seeds = self.model.watchers[var.0].iter().copied();
            if self.model.propagate(domains, &mut trail, seeds).is_err() {
                self.check_clock();
                continue;
            }
            self.visit(domains, &trail, &mut stack, position + 1);
        }
    }

    /// Counts a node, then either records it as a solution or opens a
    /// choice on the first unfixed variable at or after `from` in the
    /// branching order. Variables before `from` are already fixed.
    fn visit(
        &mut self,
        domains: &[Interval],
        trail: &Trail,
        stack: &mut Vec<Choice>,
        from: usize,
    ) {
        self.nodes += 1;
        if self.node_limit.is_some_and(|limit| self.nodes > limit) {
            self.stop = Some("nodes");
            return;
        }
        self.check_clock();
        if self.stop.is_some() || self.cannot_improve(domains) {
            return;
        }

        let next = self.order[from..]
            .iter()
            .enumerate()
            .find(|(_, var)| domains[var.0].as_point().is_none());
        match next {
            None => self.record(domains),
            Some((offset, &var)) => {
                let Interval { lo, hi } = domains[var.0];
                stack.push(Choice {
                    var,
                    position: from + offset,
                    next: lo,
                    hi,
                    mark: trail.mark(),
                });
            }
        }
    }

    fn check_clock(&mut self) {
        if self.started.elapsed() >= self.time_limit {
            self.stop = Some("time");
        }
    }

    fn cannot_improve(&self, domains: &[Interval]) -> bool {
        let Some((best, _)) = &self.best else {
            return false;
        };
        match self.objective_bound(domains) {
            Ok(bound) => bound >= *best,
            Err(_) => true,
        }
    }

    fn objective_bound(&self, domains: &[Interval]) -> Result<i128, Conflict> {
        let mut total = Interval::point(0);
        for &(negated, term) in self.objective {
            let value = self.model.forward(domains, term)?;
            total = if negated {
                total.sub(value)
            } else {
                total.add(value)
            };
        }
        Ok(total.lo)
    }

    fn record(&mut self, domains: &[Interval]) {
        if !self.model.satisfied(domains) {
            return;
        }
        let Ok(value) = self.objective_bound(domains) else {
            return;
        };
        if self.best.as_ref().map_or(true, |(best, _)| value < *best) {
            debug!(event = "incumbent", objective = %value, nodes = self.nodes);
            self.best = Some((value, domains.to_vec()));
        }
    }
}
