//! Tests for the expression, comparison and document grammars.

use gridforge_test::documents;
use proptest::prelude::*;

use super::*;
use crate::ast::Relation;
use crate::combinator::Parser;
use crate::error::{DocumentError, LineFailure};

fn con(n: i64) -> Expression {
    Expression::constant(n)
}

fn var(name: &str) -> Expression {
    Expression::variable(name)
}

fn cell(row: Expression, col: Expression) -> Expression {
    Expression::matrix_ref(row, col)
}

fn ij() -> Expression {
    cell(var("i"), var("j"))
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

#[test]
fn test_atoms() {
    assert_eq!(parse_expression("123"), Some(con(123)));
    assert_eq!(parse_expression("-5"), Some(con(-5)));
    assert_eq!(parse_expression("abc"), Some(var("abc")));
    assert_eq!(parse_expression("A[2][1]"), Some(cell(con(2), con(1))));
}

#[test]
fn test_atom_leaves_rest() {
    assert_eq!(
        expression::atom("123 abc"),
        Some((con(123), "abc"))
    );
    assert_eq!(expression::atom("abc 123"), Some((var("abc"), "123")));
}

#[test]
fn test_matrix_ref_tried_before_identifier() {
    assert_eq!(parse_expression("A[i][j]"), Some(ij()));
    // Without brackets `A` is an ordinary identifier.
    assert_eq!(parse_expression("A"), Some(var("A")));
    assert_eq!(parse_expression("Abc"), Some(var("Abc")));
}

#[test]
fn test_matrix_ref_with_whitespace_and_nested_indices() {
    assert_eq!(
        parse_expression("A [ i + 1 ] [ A[0][j] ]"),
        Some(cell(
            Expression::add(var("i"), con(1)),
            cell(con(0), var("j"))
        ))
    );
}

#[test]
fn test_multiplication_binds_tighter() {
    assert_eq!(
        parse_expression("123 + 125 * 71 + 10"),
        Some(Expression::add(
            con(123),
            Expression::add(Expression::mul(con(125), con(71)), con(10))
        ))
    );
}

#[test]
fn test_subtraction_is_right_associative() {
    assert_eq!(
        parse_expression("a - b - c"),
        Some(Expression::sub(var("a"), Expression::sub(var("b"), var("c"))))
    );
}

#[test]
fn test_multiplication_is_right_associative() {
    assert_eq!(
        parse_expression("a * b * c"),
        Some(Expression::mul(var("a"), Expression::mul(var("b"), var("c"))))
    );
}

#[test]
fn test_addition_and_subtraction_share_a_level() {
    assert_eq!(
        parse_expression("a - b + c"),
        Some(Expression::sub(var("a"), Expression::add(var("b"), var("c"))))
    );
    assert_eq!(
        parse_expression("a + b - c"),
        Some(Expression::add(var("a"), Expression::sub(var("b"), var("c"))))
    );
}

#[test]
fn test_parenthesized() {
    assert_eq!(
        parse_expression("(A[1][2] * A[a][b] + 2)"),
        Some(Expression::paren(Expression::add(
            Expression::mul(cell(con(1), con(2)), cell(var("a"), var("b"))),
            con(2)
        )))
    );
    assert_eq!(
        parse_expression("( A[a][v] - 5 ) * ( A[a][v] + 5 )"),
        Some(Expression::mul(
            Expression::paren(Expression::sub(cell(var("a"), var("v")), con(5))),
            Expression::paren(Expression::add(cell(var("a"), var("v")), con(5)))
        ))
    );
}

#[test]
fn test_mixed_chain_with_parenthesized_tail() {
    assert_eq!(
        parse_expression("A[1][2] * A[a][b] - 2 - ( A[a][v] - 5 )"),
        Some(Expression::sub(
            Expression::mul(cell(con(1), con(2)), cell(var("a"), var("b"))),
            Expression::sub(
                con(2),
                Expression::paren(Expression::sub(cell(var("a"), var("v")), con(5)))
            )
        ))
    );
}

#[test]
fn test_malformed_expressions() {
    assert_eq!(parse_expression(""), None);
    assert_eq!(parse_expression("a +"), None);
    assert_eq!(parse_expression("(a"), None);
    assert_eq!(parse_expression("A[1]"), None);
    assert_eq!(parse_expression("a b"), None);
}

// ---------------------------------------------------------------------------
// Comparisons
// ---------------------------------------------------------------------------

#[test]
fn test_each_relation() {
    let cases = [
        ("A[1][2] = A[x][a];", Relation::Eq),
        ("A[1][2] < A[x][a];", Relation::Lt),
        ("A[1][2] > A[x][a];", Relation::Gt),
        ("A[1][2] <= A[x][a];", Relation::Le),
        ("A[1][2] >= A[x][a];", Relation::Ge),
    ];
    for (text, relation) in cases {
        assert_eq!(
            parse_condition(text),
            Some(Condition::new(
                relation,
                cell(con(1), con(2)),
                cell(var("x"), var("a"))
            )),
            "{text}"
        );
    }
}

#[test]
fn test_cascade_prefers_earlier_operator() {
    // `<` and `>` are prefixes of `<=` and `>=`; the longer operators come
    // first in the cascade and win.
    assert_eq!(
        parse_condition("x <= 1;").map(|c| c.relation),
        Some(Relation::Le)
    );
    assert_eq!(
        parse_condition("x >= 1;").map(|c| c.relation),
        Some(Relation::Ge)
    );
    assert_eq!(
        parse_condition("x < = 1;").map(|c| c.relation),
        Some(Relation::Le)
    );
}

#[test]
fn test_comparison_leaves_rest() {
    assert_eq!(
        comparison::comparison("A[1][2] = 2 abc"),
        Some((Condition::eq(cell(con(1), con(2)), con(2)), "abc"))
    );
}

#[test]
fn test_conditions_from_real_documents() {
    assert_eq!(
        parse_condition("A[i][j] > -5;"),
        Some(Condition::gt(ij(), con(-5)))
    );
    assert_eq!(
        parse_condition("A[1][j] + A[2][j] > 1;"),
        Some(Condition::gt(
            Expression::add(cell(con(1), var("j")), cell(con(2), var("j"))),
            con(1)
        ))
    );
    assert_eq!(
        parse_condition("A[i][j] < A[i+1][j];"),
        Some(Condition::lt(
            ij(),
            cell(Expression::add(var("i"), con(1)), var("j"))
        ))
    );
    assert_eq!(
        parse_condition("A[i][i+k] < A[i][i+k+1];"),
        Some(Condition::lt(
            cell(var("i"), Expression::add(var("i"), var("k"))),
            cell(
                var("i"),
                Expression::add(var("i"), Expression::add(var("k"), con(1)))
            )
        ))
    );
}

#[test]
fn test_squared_difference_condition() {
    let diff = || {
        Expression::paren(Expression::sub(
            ij(),
            cell(Expression::add(var("i"), con(1)), var("j")),
        ))
    };
    assert_eq!(
        parse_condition("(A[i][j] - A[i+1][j])*(A[i][j] - A[i+1][j]) >= 1 ;"),
        Some(Condition::ge(Expression::mul(diff(), diff()), con(1)))
    );
}

#[test]
fn test_condition_requires_terminator() {
    assert_eq!(parse_condition("A[i][j] >= 1"), None);
    assert_eq!(parse_condition("A[i][j] >= 1;;"), None);
}

#[test]
fn test_condition_requires_exactly_one_relation() {
    assert_eq!(parse_condition("A[i][j];"), None);
    assert_eq!(parse_condition("a < b < c;"), None);
    assert_eq!(parse_condition("a = = b;"), None);
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

#[test]
fn test_dimension() {
    assert_eq!(parse_dimension("4 , 10 ;"), Some(Dimension::new(4, 10)));
    assert_eq!(parse_dimension("01 , 3   ;"), Some(Dimension::new(1, 3)));
    assert_eq!(parse_dimension("2, 2 ;"), Some(Dimension::new(2, 2)));
    assert_eq!(parse_dimension("  2,2;  "), Some(Dimension::new(2, 2)));
}

#[test]
fn test_dimension_rejects_malformed_headers() {
    assert_eq!(parse_dimension("2, 2"), None);
    assert_eq!(parse_dimension("-2, 2;"), None);
    assert_eq!(parse_dimension("2; 2;"), None);
    assert_eq!(parse_dimension("2, 2; x"), None);
}

#[test]
fn test_document() {
    let doc = Document::parse(documents::PINNED_CORNER).unwrap();
    assert_eq!(doc.dimension, Dimension::new(2, 2));
    assert_eq!(
        doc.conditions,
        vec![
            Condition::ge(ij(), con(1)),
            Condition::eq(cell(con(0), con(0)), con(5)),
        ]
    );
}

#[test]
fn test_document_keeps_file_order() {
    let doc = Document::parse(documents::NEIGHBOURS_DIFFER).unwrap();
    assert_eq!(doc.dimension, Dimension::new(3, 3));
    let relations: Vec<_> = doc.conditions.iter().map(|c| c.relation).collect();
    assert_eq!(
        relations,
        vec![Relation::Gt, Relation::Eq, Relation::Ge, Relation::Ge]
    );
}

#[test]
fn test_document_skips_blank_lines() {
    let doc = Document::parse(documents::WITH_BLANK_LINES).unwrap();
    assert_eq!(doc.conditions.len(), 2);
}

#[test]
fn test_document_reports_every_bad_line() {
    let err = Document::parse(documents::MALFORMED).unwrap_err();
    assert_eq!(
        err,
        DocumentError::InvalidConditions(vec![
            LineFailure {
                line: 2,
                text: "A[i][j] >= 1".to_string(),
            },
            LineFailure {
                line: 4,
                text: "A[i][j] = = 2;".to_string(),
            },
        ])
    );
}

#[test]
fn test_document_header_errors() {
    assert_eq!(Document::parse(""), Err(DocumentError::MissingDimension));
    assert_eq!(
        Document::parse("2 2;\nA[i][j] = 1;"),
        Err(DocumentError::InvalidDimension {
            text: "2 2;".to_string()
        })
    );
}

#[test]
fn test_repeated_parses_are_independent() {
    let first = Document::parse(documents::PINNED_CORNER).unwrap();
    let second = Document::parse(documents::PINNED_CORNER).unwrap();
    assert_eq!(first, second);
    assert_eq!(second.conditions.len(), 2);
}

#[test]
fn test_document_display_reparses() {
    let doc = Document::parse(documents::NEIGHBOURS_DIFFER).unwrap();
    let reparsed = Document::parse(&doc.to_string()).unwrap();
    assert_eq!(doc, reparsed);
}

#[test]
fn test_rules_compose_with_engine() {
    use crate::combinator::rule;

    assert_eq!(
        rule(document::dimension).parse("3,4; rest"),
        Some((Dimension::new(3, 4), "rest"))
    );
}

// ---------------------------------------------------------------------------
// Render / reparse
// ---------------------------------------------------------------------------

/// Rewrites an arbitrary tree into one the grammar could have produced, by
/// parenthesising operands that would otherwise bind differently.
fn grammar_shaped(expr: Expression) -> Expression {
    fn is_sum(e: &Expression) -> bool {
        matches!(e, Expression::Add(..) | Expression::Sub(..))
    }
    fn is_product(e: &Expression) -> bool {
        matches!(e, Expression::Mul(..))
    }
    fn wrap_if(e: Expression, wrap: bool) -> Expression {
        if wrap {
            Expression::paren(e)
        } else {
            e
        }
    }

    match expr {
        Expression::Constant(_) | Expression::Variable(_) => expr,
        Expression::Paren(inner) => Expression::paren(grammar_shaped(*inner)),
        Expression::MatrixRef(row, col) => {
            Expression::matrix_ref(grammar_shaped(*row), grammar_shaped(*col))
        }
        Expression::Add(l, r) => {
            let l = grammar_shaped(*l);
            let wrap = is_sum(&l);
            Expression::add(wrap_if(l, wrap), grammar_shaped(*r))
        }
        Expression::Sub(l, r) => {
            let l = grammar_shaped(*l);
            let wrap = is_sum(&l);
            Expression::sub(wrap_if(l, wrap), grammar_shaped(*r))
        }
        Expression::Mul(l, r) => {
            let l = grammar_shaped(*l);
            let r = grammar_shaped(*r);
            let wrap_l = is_sum(&l) || is_product(&l);
            let wrap_r = is_sum(&r);
            Expression::mul(wrap_if(l, wrap_l), wrap_if(r, wrap_r))
        }
    }
}

fn arb_expression() -> impl Strategy<Value = Expression> {
    let leaf = prop_oneof![
        (-50i64..50).prop_map(Expression::constant),
        "[a-z][a-z0-9]{0,3}".prop_map(Expression::variable),
    ];
    leaf.prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Expression::add(l, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Expression::sub(l, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Expression::mul(l, r)),
            (inner.clone(), inner.clone()).prop_map(|(r, c)| Expression::matrix_ref(r, c)),
            inner.prop_map(Expression::paren),
        ]
    })
}

proptest! {
    #[test]
    fn test_render_reparse_round_trip(expr in arb_expression()) {
        let expr = grammar_shaped(expr);
        prop_assert_eq!(parse_expression(&expr.to_string()), Some(expr));
    }

    #[test]
    fn test_dimension_round_trip(rows in 0usize..10_000, cols in 0usize..10_000, pad in 0usize..3) {
        let spaces = " ".repeat(pad);
        let text = format!("{spaces}{rows:03}{spaces},{spaces}{cols}{spaces};{spaces}");
        prop_assert_eq!(parse_dimension(&text), Some(Dimension::new(rows, cols)));
    }
}
