use std::path::Path;

use gridforge::{
    parse_file, solve_file, ConfigError, Document, GridForgeConfig, GridForgeError, GridOutcome,
};
use thiserror::Error;

/// Message printed when the solver finds no grid.
pub const NO_SOLUTION: &str = "No solution found!";

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    GridForge(#[from] GridForgeError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Loads the configuration for `solve`: an explicit file must load, the
/// default `gridforge.toml` is optional. Flags override both.
pub fn load_config(
    path: Option<&Path>,
    timeout_ms: Option<u64>,
    one_based: bool,
) -> Result<GridForgeConfig, CliError> {
    let mut config = match path {
        Some(path) => GridForgeConfig::load(path)?,
        None => GridForgeConfig::load("gridforge.toml").unwrap_or_default(),
    };
    if let Some(timeout_ms) = timeout_ms {
        config = config.with_timeout_ms(timeout_ms);
    }
    if one_based {
        config = config.with_one_based(true);
    }
    Ok(config)
}

pub fn solve(path: &Path, config: &GridForgeConfig) -> Result<String, CliError> {
    let outcome = solve_file(path, config)?;
    Ok(render_outcome(&outcome))
}

pub fn parse(path: &Path, json: bool) -> Result<String, CliError> {
    let document = parse_file(path)?;
    if json {
        Ok(serde_json::to_string_pretty(&document)?)
    } else {
        Ok(render_document(&document))
    }
}

/// One line per row, cells separated by single spaces.
pub fn render_outcome(outcome: &GridOutcome) -> String {
    match outcome.grid() {
        Some(rows) => rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n"),
        None => NO_SOLUTION.to_string(),
    }
}

fn render_document(document: &Document) -> String {
    document.to_string().trim_end().to_string()
}
