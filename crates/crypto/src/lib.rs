//! Device fingerprint and request-signing primitives for SKAS.
//!
//! This crate reproduces the client half of two remote protocols:
//!
//! - **Fingerprint handshake**: a device profile is hashed
//!   ([`canonical`]), obfuscated field by field ([`field_cipher`]), compressed
//!   and sealed with a per-request AES key ([`packer`]) whose seed travels
//!   RSA-encrypted alongside it ([`envelope`]).
//! - **Request signing**: HMAC-SHA256 then MD5 over path, body, skewed
//!   timestamp and a small context object ([`signing`]).
//!
//! All constants (keys, IV, compression level, padding) are fixed by the
//! remote verifiers. None of this is a security boundary for SKAS itself.

pub mod canonical;
pub mod envelope;
pub mod error;
pub mod field_cipher;
pub mod packer;
pub mod profile;
pub mod signing;

#[cfg(test)]
mod test_vectors;

pub use canonical::{canonical_string, integrity_hash};
pub use envelope::{verifier_public_key, SessionEnvelope, SessionSecret};
pub use error::{CryptoError, CryptoResult};
pub use field_cipher::{
    apply_field_cipher, decrypt_field, encrypt_field, CipherKind, CipheredProfile, FieldSpec,
    ProfileField,
};
pub use packer::pack;
pub use profile::{DeviceProfile, ProfileValue};
pub use signing::{sign_request, signing_timestamp, SignatureContext, SignedHeaders};
