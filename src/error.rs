//! Error types for geodecode.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeodecodeError>;

#[derive(Debug, Error)]
pub enum GeodecodeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A batch query was rejected as a whole because one coordinate was out of range.
    #[error("Invalid coordinate at index {index}: {reason}")]
    InvalidCoordinate { index: usize, reason: String },

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "toml")]
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl GeodecodeError {
    /// True for errors caused by caller-supplied coordinates.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            GeodecodeError::InvalidInput(_) | GeodecodeError::InvalidCoordinate { .. }
        )
    }
}
