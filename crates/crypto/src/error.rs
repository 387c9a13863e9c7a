//! Error types for SKAS crypto operations.

use thiserror::Error;

/// Errors that can occur while fingerprinting or signing.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key material rejected by a primitive
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// The embedded verifier public key could not be parsed
    #[error("Public key error: {0}")]
    PublicKey(String),

    /// Encryption failed
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Malformed base64/hex input
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Compression I/O errors
    #[error("Compression error: {0}")]
    Compression(#[from] std::io::Error),
}

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
