//! CLI error types

use bonification_types::BonificationError;
use thiserror::Error;

/// CLI error types
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Scenario file could not be used
    #[error("Scenario error: {0}")]
    Scenario(String),

    /// Engine rejected an operation
    #[error("Engine error: {0}")]
    Engine(#[from] BonificationError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
