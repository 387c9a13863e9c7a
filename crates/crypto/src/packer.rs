//! Two-stage payload packing.
//!
//! ciphered profile → JSON → gzip (level 2, mtime 0) → base64 text →
//! AES-128-CBC (fixed IV, zero padding, session key) → lowercase hex.
//!
//! Every constant here is checked by the remote verifier.

use aes::Aes128;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use cbc::cipher::{block_padding::NoPadding, BlockEncryptMut, KeyIvInit};
use flate2::{Compression, GzBuilder};
use std::io::Write;

use crate::envelope::SessionSecret;
use crate::error::{CryptoError, CryptoResult};
use crate::field_cipher::CipheredProfile;

type Aes128CbcEnc = cbc::Encryptor<Aes128>;

/// Fixed CBC initialization vector.
pub const PACK_IV: &[u8; 16] = b"0102030405060708";

/// gzip compression level.
pub const PACK_COMPRESSION_LEVEL: u32 = 2;

/// AES block size in bytes.
pub const AES_BLOCK: usize = 16;

/// Pack a ciphered profile into the hex `data` field of the fingerprint request.
pub fn pack(profile: &CipheredProfile, secret: &SessionSecret) -> CryptoResult<String> {
    let compressed = compress_json(profile)?;
    let encoded = STANDARD.encode(compressed);
    seal(encoded.as_bytes(), secret)
}

/// Serialize to JSON (non-ASCII kept literal) and gzip with a zeroed mtime.
pub fn compress_json(profile: &CipheredProfile) -> CryptoResult<Vec<u8>> {
    let json = serde_json::to_string(profile)?;
    let mut encoder = GzBuilder::new()
        .mtime(0)
        .write(Vec::new(), Compression::new(PACK_COMPRESSION_LEVEL));
    encoder.write_all(json.as_bytes())?;
    Ok(encoder.finish()?)
}

/// AES-128-CBC encrypt `data` and return lowercase hex.
///
/// One zero byte is always appended, then zeros up to the block size.
pub fn seal(data: &[u8], secret: &SessionSecret) -> CryptoResult<String> {
    let mut buf = data.to_vec();
    buf.push(0);
    let rem = buf.len() % AES_BLOCK;
    if rem != 0 {
        buf.resize(buf.len() + AES_BLOCK - rem, 0);
    }

    let len = buf.len();
    let cipher = Aes128CbcEnc::new(secret.as_bytes().into(), PACK_IV.into());
    let ciphertext = cipher
        .encrypt_padded_mut::<NoPadding>(&mut buf, len)
        .map_err(|_| CryptoError::Encryption("payload is not block aligned".to_string()))?;
    Ok(hex::encode(ciphertext))
}
