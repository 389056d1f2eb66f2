//! End-to-end tests: document text through to the minimal grid.

use std::io::Write;

use gridforge::prelude::*;
use gridforge::{solve_document_with, DocumentError, InstantiationError, SolverError};
use gridforge_test::documents;

fn config() -> GridForgeConfig {
    GridForgeConfig::default().with_domain(-100, 100).with_timeout_ms(10_000)
}

#[test]
fn test_pinned_corner() {
    let outcome = solve_str(documents::PINNED_CORNER, &config()).unwrap();
    assert_eq!(outcome, GridOutcome::Solved(vec![vec![5, 1], vec![1, 1]]));
}

#[test]
fn test_contradiction_has_no_solution() {
    let outcome = solve_str(documents::CONTRADICTION, &config()).unwrap();
    assert_eq!(outcome, GridOutcome::NoSolution);
}

#[test]
fn test_default_config_solves() {
    let outcome = solve_str(documents::PINNED_CORNER, &GridForgeConfig::default()).unwrap();
    assert_eq!(outcome.grid(), Some(&[vec![5, 1], vec![1, 1]][..]));
}

#[test]
fn test_one_based_strips_padding() {
    let outcome = solve_str(documents::ONE_BASED, &config().with_one_based(true)).unwrap();
    assert_eq!(outcome, GridOutcome::Solved(vec![vec![4, 1], vec![1, 1]]));
}

#[test]
fn test_one_based_document_without_padding() {
    // A[1][1] exists in a 2x2 grid, so this solves; the pinned cell just
    // lands bottom-right instead of top-left.
    let outcome = solve_str(documents::ONE_BASED, &config()).unwrap();
    assert_eq!(outcome, GridOutcome::Solved(vec![vec![1, 1], vec![1, 4]]));
}

#[test]
fn test_out_of_range_is_an_error() {
    let err = solve_str(documents::OUT_OF_RANGE, &config()).unwrap_err();
    assert!(matches!(err, GridForgeError::Instantiation(_)));
    assert!(err.to_string().contains("outside the 2x2 grid"));
}

#[test]
fn test_malformed_document_is_an_error() {
    let err = solve_str(documents::MALFORMED, &config()).unwrap_err();
    match err {
        GridForgeError::Document(DocumentError::InvalidConditions(lines)) => {
            let numbers: Vec<_> = lines.iter().map(|l| l.line).collect();
            assert_eq!(numbers, vec![2, 4]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_solve_file_and_parse_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", documents::INCREASING_ROW).unwrap();

    let document = parse_file(file.path()).unwrap();
    assert_eq!(document.dimension, Dimension::new(1, 3));
    assert_eq!(document.conditions.len(), 3);

    let outcome = solve_file(file.path(), &config()).unwrap();
    assert_eq!(outcome, GridOutcome::Solved(vec![vec![1, 2, 3]]));
}

#[test]
fn test_missing_file() {
    let err = solve_file("/nonexistent/grid.txt", &config()).unwrap_err();
    assert!(matches!(err, GridForgeError::Io(_)));
}

#[test]
fn test_node_limit_reports_no_solution() {
    let config = config().with_node_limit(1);
    let outcome = solve_str(documents::INCREASING_ROW, &config).unwrap();
    assert_eq!(outcome, GridOutcome::NoSolution);
}

#[test]
fn test_custom_solver() {
    let document = Document::parse(documents::NEGATIVE_ONLY).unwrap();
    let mut solver = SearchSolver::from_settings(&config().solver);
    let outcome = solve_document_with(&mut solver, &document, &config()).unwrap();
    assert_eq!(outcome, GridOutcome::Solved(vec![vec![-3, -3]]));
    assert!(solver.nodes_explored() > 0);
    assert_eq!(solver.assertion_count(), 2 * 2);
}

#[test]
fn test_independent_runs() {
    let first = solve_str(documents::SHARED_SYMBOL, &config()).unwrap();
    let second = solve_str(documents::SHARED_SYMBOL, &config()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, GridOutcome::Solved(vec![vec![2, 2, 2]]));
}

#[test]
fn test_default_config_reaches_past_box() {
    let outcome = solve_str("1, 1;\nA[0][0] = 5000;\n", &GridForgeConfig::default()).unwrap();
    assert_eq!(outcome, GridOutcome::Solved(vec![vec![5000]]));
}

#[test]
fn test_lower_bound_past_box() {
    let text = "1, 2;\nA[i][j] >= 2500;\nA[0][1] > A[0][0];\n";
    let outcome = solve_str(text, &config()).unwrap();
    assert_eq!(outcome, GridOutcome::Solved(vec![vec![2500, 2501]]));
}

#[test]
fn test_large_grid() {
    let outcome = solve_str("60, 60;\nA[i][j] >= 1;\n", &GridForgeConfig::default()).unwrap();
    let rows = outcome.grid().unwrap();
    assert_eq!(rows.len(), 60);
    assert!(rows.iter().all(|row| row.len() == 60 && row.iter().all(|&v| v == 1)));
}

#[test]
fn test_oversized_grid_is_an_error() {
    let err = solve_str("9999999999, 9999999999;\nA[i][j] >= 1;\n", &config()).unwrap_err();
    assert!(matches!(
        err,
        GridForgeError::Instantiation(InstantiationError::Grid(SolverError::GridTooLarge {
            rows: 9_999_999_999,
            cols: 9_999_999_999,
        }))
    ));
}
