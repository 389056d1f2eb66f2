//! Relational conditions joining two expressions.

use crate::ast::{Condition, Expression, Relation};
use crate::combinator::{map, or_else, rule, sequence, ParseOutcome, Parser};
use crate::grammar::expression::expression;
use crate::lexical::{character, operator, token};

/// `expression <relation> expression`, without the terminating `;`.
///
/// The operator is picked by ordered choice in [`Relation::CASCADE`] order
/// (`=`, `<=`, `>=`, `>`, `<`), so the two-character operators are always
/// seen before their one-character prefixes.
pub fn comparison(input: &str) -> ParseOutcome<'_, Condition> {
    sequence(rule(expression), cascade).parse(input)
}

/// A comparison followed by its terminating `;`, which is discarded.
pub fn condition(input: &str) -> ParseOutcome<'_, Condition> {
    sequence(rule(comparison), |cond: Condition| {
        map(token(character(';')), move |_| cond.clone())
    })
    .parse(input)
}

fn cascade(left: Expression) -> impl Parser<Output = Condition> {
    let [eq, le, ge, gt, lt] = Relation::CASCADE;
    or_else(
        relation(eq, left.clone()),
        or_else(
            relation(le, left.clone()),
            or_else(
                relation(ge, left.clone()),
                or_else(relation(gt, left.clone()), relation(lt, left)),
            ),
        ),
    )
}

fn relation(kind: Relation, left: Expression) -> impl Parser<Output = Condition> {
    sequence(operator(kind.symbol()), move |_| {
        let left = left.clone();
        map(rule(expression), move |right| {
            Condition::new(kind, left.clone(), right)
        })
    })
}
