//! Error types for GridForge parsing

use std::fmt;

use thiserror::Error;

/// A condition line that did not parse completely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFailure {
    /// 1-based physical line number in the document.
    pub line: usize,
    /// The raw line text.
    pub text: String,
}

impl fmt::Display for LineFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {:?}", self.line, self.text)
    }
}

/// Reasons a document is rejected as a whole.
///
/// Grammar failures carry no position within a line: a line either parses
/// completely or it does not.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The document has no header line at all.
    #[error("Missing dimension header")]
    MissingDimension,

    /// Line 1 is not of the form `<nat> , <nat> ;`.
    #[error("Invalid dimension header: {text:?}")]
    InvalidDimension { text: String },

    /// One or more condition lines failed to parse.
    #[error("Invalid conditions: {}", format_failures(.0))]
    InvalidConditions(Vec<LineFailure>),
}

fn format_failures(failures: &[LineFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for document parsing
pub type Result<T> = std::result::Result<T, DocumentError>;
