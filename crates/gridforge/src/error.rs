//! Error types for the GridForge pipeline

use gridforge_config::ConfigError;
use gridforge_core::DocumentError;
use gridforge_solver::InstantiationError;
use thiserror::Error;

/// Main error type for GridForge operations
#[derive(Debug, Error)]
pub enum GridForgeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The document text is malformed
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// A condition could not be handed to the solver
    #[error("Instantiation error: {0}")]
    Instantiation(#[from] InstantiationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for GridForge operations
pub type Result<T> = std::result::Result<T, GridForgeError>;
