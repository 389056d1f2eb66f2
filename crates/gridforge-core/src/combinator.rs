//! Ordered-choice parser combinators over character input.
//!
//! Every parser maps an input slice to a [`ParseOutcome`]: either no match, or
//! exactly one `(value, remaining input)` pair. There are never multiple
//! alternatives in flight, and a committed choice is never revisited when a
//! later stage fails. Grammar disambiguation relies on this: the first
//! alternative of an [`or_else`] that matches wins.
//!
//! # Example
//!
//! ```
//! use gridforge_core::combinator::{item, or_else, sequence, succeed, Parser};
//!
//! let two = sequence(item(), |first| {
//!     sequence(item(), move |second| succeed((first, second)))
//! });
//! assert_eq!(two.parse("abc"), Some((('a', 'b'), "c")));
//!
//! let either = or_else(two, succeed(('?', '?')));
//! assert_eq!(either.parse("x"), Some((('?', '?'), "x")));
//! ```

use std::marker::PhantomData;


/// Result of running a parser: `None` is "no match", `Some` is the single
/// `(value, rest)` pair.
pub type ParseOutcome<'a, T> = Option<(T, &'a str)>;

/// A deterministic parser over `&str` input.
pub trait Parser {
    /// Value produced on a match.
    type Output;

    /// Runs the parser against `input`.
    fn parse<'a>(&self, input: &'a str) -> ParseOutcome<'a, Self::Output>;
}

impl<P: Parser + ?Sized> Parser for &P {
    type Output = P::Output;

    fn parse<'a>(&self, input: &'a str) -> ParseOutcome<'a, Self::Output> {
        (**self).parse(input)
    }
}

/// Runs `parser` and accepts the result only when the whole input was consumed.
pub fn parse_all<P: Parser>(parser: P, input: &str) -> Option<P::Output> {
    let (value, rest) = parser.parse(input)?;
    rest.is_empty().then_some(value)
}

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

/// Consumes one character; fails at end of input.
#[derive(Debug, Clone, Copy, Default)]
pub struct Item;

impl Parser for Item {
    type Output = char;

    fn parse<'a>(&self, input: &'a str) -> ParseOutcome<'a, char> {
        let mut chars = input.chars();
        let c = chars.next()?;
        Some((c, chars.as_str()))
    }
}

pub fn item() -> Item {
    Item
}

/// Always matches with a clone of the stored value, consuming nothing.
#[derive(Debug, Clone)]
pub struct Succeed<T>(T);

impl<T: Clone> Parser for Succeed<T> {
    type Output = T;

    fn parse<'a>(&self, input: &'a str) -> ParseOutcome<'a, T> {
        Some((self.0.clone(), input))
    }
}

pub fn succeed<T: Clone>(value: T) -> Succeed<T> {
    Succeed(value)
}

/// Never matches.
#[derive(Debug)]
pub struct Fail<T>(PhantomData<fn() -> T>);

impl<T> Parser for Fail<T> {
    type Output = T;

    fn parse<'a>(&self, _input: &'a str) -> ParseOutcome<'a, T> {
        None
    }
}

pub fn fail<T>() -> Fail<T> {
    Fail(PhantomData)
}

/// Matches with the value when it is present, fails otherwise.
///
/// Bridges a computed `Option` (for example a checked arithmetic result) back
/// into the parser world without consuming input.
#[derive(Debug, Clone)]
pub struct Lift<T>(Option<T>);

impl<T: Clone> Parser for Lift<T> {
    type Output = T;

    fn parse<'a>(&self, input: &'a str) -> ParseOutcome<'a, T> {
        self.0.clone().map(|value| (value, input))
    }
}

pub fn lift<T: Clone>(value: Option<T>) -> Lift<T> {
    Lift(value)
}

/// Monadic bind: runs `first`, feeds its value to `and_then` to obtain the
/// next parser, and runs that on the remainder.
pub struct Sequence<P, K> {
    first: P,
    and_then: K,
}

impl<P, K, Q> Parser for Sequence<P, K>
where
    P: Parser,
    K: Fn(P::Output) -> Q,
    Q: Parser,
{
    type Output = Q::Output;

    fn parse<'a>(&self, input: &'a str) -> ParseOutcome<'a, Q::Output> {
        let (value, rest) = self.first.parse(input)?;
        (self.and_then)(value).parse(rest)
    }
}

pub fn sequence<P, K, Q>(first: P, and_then: K) -> Sequence<P, K>
where
    P: Parser,
    K: Fn(P::Output) -> Q,
    Q: Parser,
{
    Sequence { first, and_then }
}

/// Ordered choice: tries `first`; only when it produces no match is `second`
/// tried, on the original input.
pub struct OrElse<P1, P2> {
    first: P1,
    second: P2,
}

impl<P1, P2> Parser for OrElse<P1, P2>
where
    P1: Parser,
    P2: Parser<Output = P1::Output>,
{
    type Output = P1::Output;

    fn parse<'a>(&self, input: &'a str) -> ParseOutcome<'a, Self::Output> {
        match self.first.parse(input) {
            Some(matched) => Some(matched),
            None => self.second.parse(input),
        }
    }
}

pub fn or_else<P1, P2>(first: P1, second: P2) -> OrElse<P1, P2>
where
    P1: Parser,
    P2: Parser<Output = P1::Output>,
{
    OrElse { first, second }
}

// ---------------------------------------------------------------------------
// Derived combinators
// ---------------------------------------------------------------------------

/// Transforms the value of a successful match.
pub struct Map<P, F> {
    parser: P,
    f: F,
}

impl<P, F, U> Parser for Map<P, F>
where
    P: Parser,
    F: Fn(P::Output) -> U,
{
    type Output = U;

    fn parse<'a>(&self, input: &'a str) -> ParseOutcome<'a, U> {
        let (value, rest) = self.parser.parse(input)?;
        Some(((self.f)(value), rest))
    }
}

pub fn map<P, F, U>(parser: P, f: F) -> Map<P, F>
where
    P: Parser,
    F: Fn(P::Output) -> U,
{
    Map { parser, f }
}

/// Greedy repetition, at least once.
///
/// Defined as `p` followed by `one_or_more(p) | succeed([])`. Recursion depth
/// is bounded by the remaining input length; a `p` that matches without
/// consuming input never terminates.
pub struct OneOrMore<P>(P);

impl<P> Parser for OneOrMore<P>
where
    P: Parser,
    P::Output: Clone,
{
    type Output = Vec<P::Output>;

    fn parse<'a>(&self, input: &'a str) -> ParseOutcome<'a, Self::Output> {
        sequence(&self.0, |first: P::Output| {
            map(or_else(self, succeed(Vec::new())), move |rest| {
                let mut values = Vec::with_capacity(rest.len() + 1);
                values.push(first.clone());
                values.extend(rest);
                values
            })
        })
        .parse(input)
    }
}

pub fn one_or_more<P>(parser: P) -> OneOrMore<P>
where
    P: Parser,
    P::Output: Clone,
{
    OneOrMore(parser)
}

/// Greedy repetition, possibly zero times. Always matches.
pub fn zero_or_more<P>(parser: P) -> OrElse<OneOrMore<P>, Succeed<Vec<P::Output>>>
where
    P: Parser,
    P::Output: Clone,
{
    or_else(one_or_more(parser), succeed(Vec::new()))
}

// ---------------------------------------------------------------------------
// Named grammar rules
// ---------------------------------------------------------------------------

/// A grammar rule backed by a plain function.
///
/// Mutually recursive grammar rules are written as `fn` items and wrapped
/// with [`rule`] where a combinator expects a parser, so recursion goes
/// through a function pointer instead of an infinitely nested type.
pub struct Rule<T> {
    run: fn(&str) -> ParseOutcome<'_, T>,
}

impl<T> Parser for Rule<T> {
    type Output = T;

    fn parse<'a>(&self, input: &'a str) -> ParseOutcome<'a, T> {
        (self.run)(input)
    }
}

pub fn rule<T>(run: fn(&str) -> ParseOutcome<'_, T>) -> Rule<T> {
    Rule { run }
}
