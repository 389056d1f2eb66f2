//! Syntax trees produced by the grammar.
//!
//! Trees are immutable once built. Free identifiers stay unbound here; the
//! instantiation step decides what `i`, `j` and every other name mean.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An arithmetic expression over integers, identifiers and grid cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expression {
    Constant(i64),
    Variable(String),
    /// `A[row][col]`; both indices are full expressions.
    MatrixRef(Box<Expression>, Box<Expression>),
    Add(Box<Expression>, Box<Expression>),
    Sub(Box<Expression>, Box<Expression>),
    Mul(Box<Expression>, Box<Expression>),
    Paren(Box<Expression>),
}

impl Expression {
    pub fn constant(value: i64) -> Self {
        Expression::Constant(value)
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Expression::Variable(name.into())
    }

    pub fn matrix_ref(row: Expression, col: Expression) -> Self {
        Expression::MatrixRef(Box::new(row), Box::new(col))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn add(left: Expression, right: Expression) -> Self {
        Expression::Add(Box::new(left), Box::new(right))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn sub(left: Expression, right: Expression) -> Self {
        Expression::Sub(Box::new(left), Box::new(right))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn mul(left: Expression, right: Expression) -> Self {
        Expression::Mul(Box::new(left), Box::new(right))
    }

    pub fn paren(inner: Expression) -> Self {
        Expression::Paren(Box::new(inner))
    }
}

/// Canonical source text; reparsing it yields the same tree.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Constant(n) => write!(f, "{n}"),
            Expression::Variable(name) => f.write_str(name),
            Expression::MatrixRef(row, col) => write!(f, "A[{row}][{col}]"),
            Expression::Add(l, r) => write!(f, "{l} + {r}"),
            Expression::Sub(l, r) => write!(f, "{l} - {r}"),
            Expression::Mul(l, r) => write!(f, "{l} * {r}"),
            Expression::Paren(inner) => write!(f, "({inner})"),
        }
    }
}

/// Relational operator of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Relation {
    Eq,
    Lt,
    Gt,
    Le,
    Ge,
}

impl Relation {
    /// Order in which the comparison grammar tries operators.
    pub const CASCADE: [Relation; 5] = [
        Relation::Eq,
        Relation::Le,
        Relation::Ge,
        Relation::Gt,
        Relation::Lt,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Relation::Eq => "=",
            Relation::Lt => "<",
            Relation::Gt => ">",
            Relation::Le => "<=",
            Relation::Ge => ">=",
        }
    }

    /// Evaluates the relation on two concrete integers.
    pub fn holds<T: Ord>(self, left: T, right: T) -> bool {
        match self {
            Relation::Eq => left == right,
            Relation::Lt => left < right,
            Relation::Gt => left > right,
            Relation::Le => left <= right,
            Relation::Ge => left >= right,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One relational statement: `left <relation> right`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Condition {
    pub relation: Relation,
    pub left: Expression,
    pub right: Expression,
}

impl Condition {
    pub fn new(relation: Relation, left: Expression, right: Expression) -> Self {
        Self {
            relation,
            left,
            right,
        }
    }

    pub fn eq(left: Expression, right: Expression) -> Self {
        Self::new(Relation::Eq, left, right)
    }

    pub fn lt(left: Expression, right: Expression) -> Self {
        Self::new(Relation::Lt, left, right)
    }

    pub fn gt(left: Expression, right: Expression) -> Self {
        Self::new(Relation::Gt, left, right)
    }

    pub fn le(left: Expression, right: Expression) -> Self {
        Self::new(Relation::Le, left, right)
    }

    pub fn ge(left: Expression, right: Expression) -> Self {
        Self::new(Relation::Ge, left, right)
    }
}

/// Renders as a complete, `;`-terminated condition line.
impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {};", self.left, self.relation, self.right)
    }
}

/// Grid size as written in the header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dimension {
    pub rows: usize,
    pub cols: usize,
}

impl Dimension {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Number of cells in the grid, or `None` if it overflows `usize`.
    pub fn cell_count(&self) -> Option<usize> {
        self.rows.checked_mul(self.cols)
    }

    /// The dimension grown by one row and one column, for documents that
    /// address cells starting at index 1. `None` if either side overflows.
    pub fn padded(&self) -> Option<Self> {
        Some(Self::new(
            self.rows.checked_add(1)?,
            self.cols.checked_add(1)?,
        ))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {};", self.rows, self.cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(row: &str, col: &str) -> Expression {
        Expression::matrix_ref(Expression::variable(row), Expression::variable(col))
    }

    #[test]
    fn test_expression_display() {
        let expr = Expression::mul(
            Expression::paren(Expression::sub(cell("i", "j"), Expression::constant(5))),
            Expression::constant(-2),
        );
        assert_eq!(expr.to_string(), "(A[i][j] - 5) * -2");
    }

    #[test]
    fn test_condition_display() {
        let cond = Condition::le(cell("i", "j"), Expression::constant(10));
        assert_eq!(cond.to_string(), "A[i][j] <= 10;");
    }

    #[test]
    fn test_relation_holds() {
        assert!(Relation::Eq.holds(3, 3));
        assert!(Relation::Le.holds(2, 3));
        assert!(!Relation::Lt.holds(3, 3));
        assert!(Relation::Ge.holds(3, 3));
        assert!(!Relation::Gt.holds(2, 3));
    }

    #[test]
    fn test_dimension() {
        let dim = Dimension::new(2, 3);
        assert_eq!(dim.cell_count(), Some(6));
        assert_eq!(dim.padded(), Some(Dimension::new(3, 4)));
        assert_eq!(dim.to_string(), "2, 3;");
    }

    #[test]
    fn test_dimension_overflow() {
        let huge = Dimension::new(usize::MAX / 2 + 1, 2);
        assert_eq!(huge.cell_count(), None);
        assert_eq!(Dimension::new(usize::MAX, 1).cell_count(), Some(usize::MAX));
        assert_eq!(Dimension::new(usize::MAX, 1).padded(), None);
        assert_eq!(Dimension::new(1, usize::MAX).padded(), None);
    }
}
