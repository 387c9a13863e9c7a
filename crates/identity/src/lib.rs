//! Simulated device identity for the SKAS portal client.
//!
//! The portal's anti-bot layer expects every request to carry a device id
//! issued by a third-party fingerprint service. This crate assembles the
//! browser profile that service expects ([`device`]), packs it with
//! `skas-crypto`, and exchanges it for a device id ([`fingerprint`]).
//!
//! Failure is never fatal: callers fall back to an empty (degraded) id and
//! let the portal decide whether to accept it.

pub mod device;
pub mod error;
pub mod fingerprint;

pub use device::{assemble_profile, smid, ProfileInputs, APP_ID, ORGANIZATION, SDK_OS};
pub use error::{IdentityError, IdentityResult};
pub use fingerprint::{
    resolve_device_id, FingerprintClient, FingerprintRequest, FINGERPRINT_SUCCESS_CODE,
    FINGERPRINT_URL,
};
