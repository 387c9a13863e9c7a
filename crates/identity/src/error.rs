//! Error types for SKAS device identity operations.

use skas_core::TransportError;
use skas_crypto::CryptoError;
use thiserror::Error;

/// Errors that can occur while obtaining a device identity.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Building the fingerprint payload failed
    #[error("Fingerprint payload error: {0}")]
    Crypto(#[from] CryptoError),

    /// The fingerprint service could not be reached or answered garbage
    #[error("Fingerprint transport error: {0}")]
    Transport(#[from] TransportError),

    /// The service answered with a non-success code
    #[error("Fingerprint service rejected the profile with code {code}")]
    Rejected { code: i64 },

    /// A success answer without a device id
    #[error("Fingerprint response missing deviceId")]
    MissingDeviceId,
}

/// Result type for identity operations.
pub type IdentityResult<T> = Result<T, IdentityError>;
