//! Error types for parsing, serialization and format operations
//!
//! The reconciliation engine itself has no error type: a shape a lens cannot express is
//! dropped from the output and logged, never reported as a failure.

use thiserror::Error;

/// Errors raised while reading or writing a document tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocError {
    #[error("XML parse error: {0}")]
    Parse(String),

    #[error("Document has no root element")]
    NoRoot,

    #[error("Invalid document: {0}")]
    Invalid(String),
}

impl From<roxmltree::Error> for DocError {
    fn from(err: roxmltree::Error) -> Self {
        DocError::Parse(err.to_string())
    }
}

/// Errors that can occur during format operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Format does not support the requested direction
    #[error("Operation not supported: {0}")]
    NotSupported(String),

    /// The document lacks an element the format needs (e.g. `w:body`)
    #[error("Missing element: {0}")]
    MissingElement(String),

    #[error(transparent)]
    Document(#[from] DocError),
}
