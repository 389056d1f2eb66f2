//! Text or file in, minimal grid out.

use std::path::Path;

use gridforge_config::GridForgeConfig;
use gridforge_core::{Dimension, Document};
use gridforge_solver::{
    generate, GridOutcome, InstantiationError, SearchSolver, Solver, SolverError,
};
use tracing::info;

use crate::error::Result;

/// Parses `text` and solves it with the bundled [`SearchSolver`].
pub fn solve_str(text: &str, config: &GridForgeConfig) -> Result<GridOutcome> {
    let document = Document::parse(text)?;
    solve_document(&document, config)
}

/// Reads, parses and solves the document at `path`.
pub fn solve_file(path: impl AsRef<Path>, config: &GridForgeConfig) -> Result<GridOutcome> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    info!(event = "document_loaded", path = %path.display(), bytes = text.len());
    solve_str(&text, config)
}

/// Reads and parses the document at `path` without solving it.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Document> {
    let text = std::fs::read_to_string(path)?;
    Ok(Document::parse(&text)?)
}

/// Solves a parsed document with the bundled [`SearchSolver`].
pub fn solve_document(document: &Document, config: &GridForgeConfig) -> Result<GridOutcome> {
    let mut solver = SearchSolver::from_settings(&config.solver);
    solve_document_with(&mut solver, document, config)
}

/// Solves a parsed document with any [`Solver`].
///
/// With `grid.one_based` set the grid is declared one row and one column
/// larger than the header says, and row 0 and column 0 are dropped from the
/// answer.
pub fn solve_document_with<S: Solver>(
    solver: &mut S,
    document: &Document,
    config: &GridForgeConfig,
) -> Result<GridOutcome> {
    let one_based = config.grid.one_based;
    let dimension = if one_based {
        let Dimension { rows, cols } = document.dimension;
        document
            .dimension
            .padded()
            .ok_or(InstantiationError::Grid(SolverError::GridTooLarge { rows, cols }))?
    } else {
        document.dimension
    };

    let outcome = generate(solver, dimension, &document.conditions, config.time_limit())?;
    Ok(if one_based {
        strip_origin(outcome)
    } else {
        outcome
    })
}

fn strip_origin(outcome: GridOutcome) -> GridOutcome {
    match outcome {
        GridOutcome::Solved(rows) => GridOutcome::Solved(
            rows.into_iter()
                .skip(1)
                .map(|row| row.into_iter().skip(1).collect())
                .collect(),
        ),
        GridOutcome::NoSolution => GridOutcome::NoSolution,
    }
}
