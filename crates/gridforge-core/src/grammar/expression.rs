//! Arithmetic expressions with grid cell references.
//!
//! ```text
//! expression := product ( ("+" | "-") expression )?
//! product    := atom ( "*" product )?
//! atom       := "A" "[" expression "]" "[" expression "]"
//!             | signed-integer
//!             | identifier
//!             | "(" expression ")"
//! ```
//!
//! Both binary levels recurse on their right operand, so `a - b - c` is
//! `a - (b - c)` and `a * b * c` is `a * (b * c)`. Existing documents depend
//! on this reading; it must not be changed to a left fold.

use crate::ast::Expression;
use crate::combinator::{map, or_else, rule, sequence, succeed, ParseOutcome, Parser};
use crate::lexical::{character, identifier, signed_integer, token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Additive {
    Plus,
    Minus,
}

impl Additive {
    fn apply(self, left: Expression, right: Expression) -> Expression {
        match self {
            Additive::Plus => Expression::add(left, right),
            Additive::Minus => Expression::sub(left, right),
        }
    }
}

fn additive_operator() -> impl Parser<Output = Additive> {
    token(or_else(
        map(character('+'), |_| Additive::Plus),
        map(character('-'), |_| Additive::Minus),
    ))
}

/// Entry rule of the expression grammar.
pub fn expression(input: &str) -> ParseOutcome<'_, Expression> {
    sequence(rule(product), |left: Expression| {
        let tail_left = left.clone();
        or_else(
            sequence(additive_operator(), move |op| {
                let left = tail_left.clone();
                map(rule(expression), move |right| op.apply(left.clone(), right))
            }),
            succeed(left),
        )
    })
    .parse(input)
}

/// Multiplicative level; binds tighter than `+` and `-`.
pub fn product(input: &str) -> ParseOutcome<'_, Expression> {
    sequence(rule(atom), |left: Expression| {
        let tail_left = left.clone();
        or_else(
            sequence(token(character('*')), move |_| {
                let left = tail_left.clone();
                map(rule(product), move |right| Expression::mul(left.clone(), right))
            }),
            succeed(left),
        )
    })
    .parse(input)
}

/// A single operand. The cell reference is tried before identifiers so a
/// leading `A` followed by brackets is never read as a plain name.
pub fn atom(input: &str) -> ParseOutcome<'_, Expression> {
    token(or_else(
        rule(matrix_ref),
        or_else(
            map(signed_integer(), Expression::Constant),
            or_else(map(identifier(), Expression::Variable), rule(parenthesized)),
        ),
    ))
    .parse(input)
}

pub fn matrix_ref(input: &str) -> ParseOutcome<'_, Expression> {
    sequence(character('A'), |_| {
        sequence(rule(bracketed), |row: Expression| {
            map(rule(bracketed), move |col| {
                Expression::matrix_ref(row.clone(), col)
            })
        })
    })
    .parse(input)
}

fn bracketed(input: &str) -> ParseOutcome<'_, Expression> {
    sequence(token(character('[')), |_| {
        sequence(rule(expression), |index: Expression| {
            map(token(character(']')), move |_| index.clone())
        })
    })
    .parse(input)
}

pub fn parenthesized(input: &str) -> ParseOutcome<'_, Expression> {
    sequence(token(character('(')), |_| {
        sequence(rule(expression), |inner: Expression| {
            map(token(character(')')), move |_| Expression::paren(inner.clone()))
        })
    })
    .parse(input)
}
