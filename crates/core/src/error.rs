//! Core error types

use thiserror::Error;

/// Core error type for SKAS
#[derive(Debug, Error)]
pub enum CoreError {
    /// Missing or malformed process configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unknown game code
    #[error("Unknown game: {0}")]
    UnknownGame(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
