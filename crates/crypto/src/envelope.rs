//! Asymmetric session envelope.
//!
//! Each fingerprint request draws a fresh random identifier. The identifier
//! is RSA (PKCS#1 v1.5) encrypted under the verifier's public key and sent as
//! `ep`; the first 16 hex characters of its MD5 become the AES key of the
//! payload packer. The verifier recovers the key by decrypting `ep`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use md5::{Digest, Md5};
use rand::{CryptoRng, RngCore};
use rsa::{pkcs8::DecodePublicKey, Pkcs1v15Encrypt, RsaPublicKey};
use std::sync::OnceLock;
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CryptoError, CryptoResult};

/// DER (SubjectPublicKeyInfo) of the fingerprint verifier's RSA-1024 key, base64.
pub const VERIFIER_PUBLIC_KEY: &str = "MIGfMA0GCSqGSIb3DQEBAQUAA4GNADCBiQKBgQCmxMNr7n8ZeT0tE1R9j/mPixoinPkeM+k4VGIn/s0k7N5rJAfnZ0eMER+QhwFvshzo0LNmeUkpR8uIlU/GEVr8mN28sKmwd2gpygqj0ePnBmOW4v0ZVwbSYK+izkhVFk2V/doLoMbWy6b+UnA8mkjvg0iYWRByfRsK2gdl7llqCwIDAQAB";

/// Session secret length in bytes.
pub const SESSION_SECRET_LEN: usize = 16;

static PUBLIC_KEY: OnceLock<Result<RsaPublicKey, String>> = OnceLock::new();

/// The verifier public key, parsed once per process.
pub fn verifier_public_key() -> CryptoResult<&'static RsaPublicKey> {
    PUBLIC_KEY
        .get_or_init(|| {
            let der = STANDARD.decode(VERIFIER_PUBLIC_KEY).map_err(|e| e.to_string())?;
            RsaPublicKey::from_public_key_der(&der).map_err(|e| e.to_string())
        })
        .as_ref()
        .map_err(|reason| CryptoError::PublicKey(reason.clone()))
}

/// Per-request AES key. Wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SessionSecret([u8; SESSION_SECRET_LEN]);

impl SessionSecret {
    /// Derive the secret from a session identifier: the first 16 hex chars of its MD5.
    pub fn derive(session_id: &str) -> Self {
        let digest = hex::encode(Md5::digest(session_id.as_bytes()));
        let mut key = [0u8; SESSION_SECRET_LEN];
        key.copy_from_slice(&digest.as_bytes()[..SESSION_SECRET_LEN]);
        Self(key)
    }

    pub fn from_bytes(key: [u8; SESSION_SECRET_LEN]) -> Self {
        Self(key)
    }

    pub fn as_bytes(&self) -> &[u8; SESSION_SECRET_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionSecret(..)")
    }
}

/// The two halves of one fingerprint request's key exchange.
#[derive(Debug)]
pub struct SessionEnvelope {
    /// Base64 RSA ciphertext of the session identifier (`ep` on the wire).
    pub ep: String,
    /// Key for the second packing stage.
    pub secret: SessionSecret,
}

impl SessionEnvelope {
    /// Seal a freshly generated session identifier.
    pub fn generate() -> CryptoResult<Self> {
        let session_id = Uuid::new_v4().to_string();
        Self::seal(&session_id, &mut rand::thread_rng())
    }

    /// Seal a given session identifier.
    pub fn seal<R: RngCore + CryptoRng>(session_id: &str, rng: &mut R) -> CryptoResult<Self> {
        let key = verifier_public_key()?;
        let ciphertext = key
            .encrypt(rng, Pkcs1v15Encrypt, session_id.as_bytes())
            .map_err(|e| CryptoError::Encryption(e.to_string()))?;

        Ok(Self {
            ep: STANDARD.encode(ciphertext),
            secret: SessionSecret::derive(session_id),
        })
    }
}
