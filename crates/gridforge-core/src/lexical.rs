//! Character-level scanners built on the combinator engine.
//!
//! Whitespace skipping never crosses into another statement: documents are
//! split into physical lines before any of these run.

use crate::combinator::{
    item, lift, map, one_or_more, or_else, sequence, zero_or_more, ParseOutcome, Parser,
};

/// An [`item`] filtered by a predicate.
#[derive(Debug, Clone, Copy)]
pub struct Satisfy<F>(F);

impl<F: Fn(char) -> bool> Parser for Satisfy<F> {
    type Output = char;

    fn parse<'a>(&self, input: &'a str) -> ParseOutcome<'a, char> {
        let (c, rest) = item().parse(input)?;
        (self.0)(c).then_some((c, rest))
    }
}

pub fn satisfy<F: Fn(char) -> bool>(pred: F) -> Satisfy<F> {
    Satisfy(pred)
}

/// Matches exactly `expected`.
pub fn character(expected: char) -> impl Parser<Output = char> {
    satisfy(move |c| c == expected)
}

pub fn digit() -> impl Parser<Output = char> {
    satisfy(|c| c.is_ascii_digit())
}

/// One or more decimal digits folded into their value.
///
/// Leading zeros are accepted (`"01"` is `1`). A literal that does not fit in
/// an `i64` is a no-match.
pub fn natural_number() -> impl Parser<Output = i64> {
    sequence(one_or_more(digit()), |digits: Vec<char>| {
        lift(digits.iter().try_fold(0i64, |value, d| {
            let d = i64::from(d.to_digit(10)?);
            value.checked_mul(10)?.checked_add(d)
        }))
    })
}

/// An optional leading `-` followed by a natural number.
pub fn signed_integer() -> impl Parser<Output = i64> {
    or_else(
        sequence(character('-'), |_| map(natural_number(), |n: i64| -n)),
        natural_number(),
    )
}

pub fn whitespace() -> impl Parser<Output = char> {
    satisfy(char::is_whitespace)
}

/// Runs the inner parser with any whitespace skipped on both sides.
#[derive(Debug, Clone, Copy)]
pub struct Token<P>(P);

impl<P: Parser> Parser for Token<P> {
    type Output = P::Output;

    fn parse<'a>(&self, input: &'a str) -> ParseOutcome<'a, P::Output> {
        let (_, rest) = zero_or_more(whitespace()).parse(input)?;
        let (value, rest) = self.0.parse(rest)?;
        let (_, rest) = zero_or_more(whitespace()).parse(rest)?;
        Some((value, rest))
    }
}

pub fn token<P: Parser>(parser: P) -> Token<P> {
    Token(parser)
}

/// An alphabetic character followed by any number of alphanumerics.
///
/// Identifiers are case-sensitive and there are no reserved words; `i`, `j`
/// and `A` only get their meaning from the grammar and the instantiation step.
pub fn identifier() -> impl Parser<Output = String> {
    sequence(satisfy(char::is_alphabetic), |first: char| {
        map(zero_or_more(satisfy(char::is_alphanumeric)), move |rest| {
            std::iter::once(first).chain(rest).collect::<String>()
        })
    })
}

/// A fixed operator spelled by one or more characters, each of which may be
/// surrounded by whitespace (`< =` reads as `<=`).
#[derive(Debug, Clone, Copy)]
pub struct Operator(&'static str);

impl Parser for Operator {
    type Output = ();

    fn parse<'a>(&self, input: &'a str) -> ParseOutcome<'a, ()> {
        let rest = self.0.chars().try_fold(input, |rest, expected| {
            token(character(expected)).parse(rest).map(|(_, rest)| rest)
        })?;
        Some(((), rest))
    }
}

pub fn operator(symbol: &'static str) -> Operator {
    Operator(symbol)
}
