//! Error types for field symbology.

use thiserror::Error;

/// Result type alias using SymbologyError.
pub type SymbologyResult<T> = Result<T, SymbologyError>;

/// Primary error type for adapting and styling field data.
///
/// Every variant is a local, deterministic failure: retrying with the same
/// input yields the same error.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SymbologyError {
    // === Symbology Errors ===
    #[error("NDVI value {value} is outside [0, 1]")]
    OutOfRangeInput { value: f64 },

    #[error("Color table must have 256 entries, found {entries}")]
    MalformedTable { entries: usize },

    #[error("Invalid color table entry {index}: {message}")]
    InvalidTableEntry { index: usize, message: String },

    // === Feature Errors ===
    #[error("Record '{id}' has no feature payload")]
    MissingPayload { id: String },

    #[error("Date index {index} out of range for feature '{id}' ({len} observations)")]
    DateIndexOutOfRange { id: String, index: usize, len: usize },

    #[error("Observation {index} of feature '{id}' has no NDVI value")]
    MissingValue { id: String, index: usize },

    #[error("No observation dated {0} in the collection")]
    DateNotFound(String),

    // === Input Errors ===
    #[error("Failed to parse input: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl SymbologyError {
    /// Short machine-readable code for logs and styled output.
    pub fn code(&self) -> &'static str {
        match self {
            SymbologyError::OutOfRangeInput { .. } => "OutOfRangeInput",
            SymbologyError::MalformedTable { .. } | SymbologyError::InvalidTableEntry { .. } => {
                "MalformedTable"
            }
            SymbologyError::MissingPayload { .. } => "MissingPayload",
            SymbologyError::MissingValue { .. } => "MissingValue",
            SymbologyError::DateIndexOutOfRange { .. } | SymbologyError::DateNotFound(_) => {
                "DateIndexOutOfRange"
            }
            SymbologyError::Parse(_) => "ParseError",
            SymbologyError::Io(_) => "IoError",
        }
    }
}

// Conversion from common error types
impl From<std::io::Error> for SymbologyError {
    fn from(err: std::io::Error) -> Self {
        SymbologyError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SymbologyError {
    fn from(err: serde_json::Error) -> Self {
        SymbologyError::Parse(format!("JSON error: {}", err))
    }
}
