//! Error types for attendance sessions

use skas_core::TransportError;
use skas_crypto::CryptoError;
use std::fmt;
use thiserror::Error;

/// Step of session setup that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStage {
    Grant,
    Credential,
    Bindings,
}

impl fmt::Display for AuthStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthStage::Grant => f.write_str("OAuth grant"),
            AuthStage::Credential => f.write_str("Credential exchange"),
            AuthStage::Bindings => f.write_str("Binding discovery"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AttendanceError {
    /// Session setup rejected by the portal. Nothing else runs for the account.
    #[error("{stage} failed: {reason}")]
    Auth { stage: AuthStage, reason: String },

    /// A single character's attendance call could not be completed
    #[error("{0}")]
    Call(TransportError),

    /// A signed call was attempted before login
    #[error("Session is not authenticated")]
    NotAuthenticated,

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl AttendanceError {
    pub fn auth(stage: AuthStage, reason: impl Into<String>) -> Self {
        AttendanceError::Auth {
            stage,
            reason: reason.into(),
        }
    }

    /// Whether the error ends the whole account session.
    pub fn is_session_fatal(&self) -> bool {
        !matches!(self, AttendanceError::Call(_))
    }
}

pub type AttendanceResult<T> = Result<T, AttendanceError>;
