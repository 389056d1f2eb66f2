//! Configuration system for GridForge.
//!
//! Load solver and grid settings from TOML or YAML so the time limit, the
//! search box and the indexing convention can change without code changes.
//!
//! # Examples
//!
//! ```
//! use gridforge_config::GridForgeConfig;
//! use std::time::Duration;
//!
//! let config = GridForgeConfig::from_toml_str(r#"
//!     [solver]
//!     timeout_ms = 5000
//!     domain_min = 0
//!     domain_max = 50
//!
//!     [grid]
//!     one_based = true
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Duration::from_millis(5000));
//! assert!(config.grid.one_based);
//! ```
//!
//! Use the defaults when the file is missing:
//!
//! ```
//! use gridforge_config::GridForgeConfig;
//!
//! let config = GridForgeConfig::load("gridforge.toml").unwrap_or_default();
//! assert_eq!(config.solver.timeout_ms, 120_000);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;


/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GridForgeConfig {
    #[serde(default)]
    pub solver: SolverSettings,

    #[serde(default)]
    pub grid: GridSettings,
}

impl GridForgeConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, picking the format from the
    /// extension: `.yaml`/`.yml` is YAML, anything else TOML.
    ///
    /// # Errors
    ///
    /// Returns error if the file can't be read, doesn't parse, or holds an
    /// empty search box.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()
    }

    /// Sets the solver time limit in milliseconds.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.solver.timeout_ms = timeout_ms;
        self
    }

    /// Turns one-based cell addressing on or off.
    pub fn with_one_based(mut self, one_based: bool) -> Self {
        self.grid.one_based = one_based;
        self
    }

    /// Sets the inclusive value range searched for every cell and symbol.
    pub fn with_domain(mut self, min: i64, max: i64) -> Self {
        self.solver.domain_min = min;
        self.solver.domain_max = max;
        self
    }

    /// Sets the maximum number of search nodes.
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.solver.node_limit = Some(limit);
        self
    }

    /// Returns the solver time limit.
    pub fn time_limit(&self) -> Duration {
        self.solver.time_limit()
    }

    /// Checks cross-field constraints that serde can't express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `domain_min > domain_max`.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.solver.domain_min > self.solver.domain_max {
            return Err(ConfigError::Invalid(format!(
                "domain_min ({}) is greater than domain_max ({})",
                self.solver.domain_min, self.solver.domain_max
            )));
        }
        Ok(self)
    }
}

/// Solver limits and the search box used by the reference backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct SolverSettings {
    /// Time limit for a single solve, in milliseconds.
    pub timeout_ms: u64,

    /// Lower bound given to a cell or symbol that the conditions leave
    /// unbounded below.
    pub domain_min: i64,

    /// Upper bound given to a cell or symbol that the conditions leave
    /// unbounded above.
    pub domain_max: i64,

    /// Maximum number of search nodes before giving up.
    pub node_limit: Option<u64>,
}

impl SolverSettings {
    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 120_000,
            domain_min: -1000,
            domain_max: 1000,
            node_limit: None,
        }
    }
}

/// How documents address grid cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct GridSettings {
    /// When set, the grid is declared one row and one column larger than the
    /// header says and row 0 / column 0 are dropped from the result, so
    /// `A[1][1]` is the top-left cell.
    pub one_based: bool,
}
