//! Error types for projection and region lookups

use thiserror::Error;

/// Errors surfaced by the registry, the engine and the scenario loaders
///
/// Every variant is a local, recoverable condition. The engine never
/// returns a partial result alongside an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Negative or non-finite numeric input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Account kind not offered in the selected region
    #[error("Account kind '{account_kind}' is not valid for region '{region}'")]
    InvalidAccountKind {
        region: String,
        account_kind: String,
    },

    /// Region id not present in the registry
    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    /// Fee erosion / retention requested against a zero fee-free baseline
    #[error("{0} is undefined when the fee-free final value is zero")]
    UndefinedMetric(&'static str),

    /// Malformed scenario or export CSV
    #[error("CSV error: {0}")]
    Csv(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<csv::Error> for EngineError {
    fn from(err: csv::Error) -> Self {
        EngineError::Csv(err.to_string())
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Io(err.to_string())
    }
}

/// Result alias used throughout the crate
pub type EngineResult<T> = Result<T, EngineError>;
