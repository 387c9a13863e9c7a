//! Per-field obfuscation of device profiles.
//!
//! Every known field is renamed to a short obfuscated name and, for most
//! fields, its string form is DES-ECB encrypted with a fixed per-field key.
//! The key table is public; this is wire compatibility with the fingerprint
//! verifier, not confidentiality.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use des::cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit};
use des::Des;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{CryptoError, CryptoResult};
use crate::profile::{DeviceProfile, ProfileValue};

/// DES block size in bytes.
pub const DES_BLOCK: usize = 8;

/// How a field value is transformed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherKind {
    /// Renamed only.
    None,
    /// Renamed and DES-ECB encrypted with the given key.
    Des([u8; DES_BLOCK]),
}

/// Wire rule for one known profile field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub cipher: CipherKind,
    pub obfuscated_name: &'static str,
}

/// Profile fields understood by the fingerprint verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    AppId,
    Box,
    Canvas,
    ClientSize,
    Organization,
    Os,
    Platform,
    Plugins,
    Pmf,
    Protocol,
    Referer,
    Res,
    Rtype,
    Sdkver,
    Status,
    SubVersion,
    Svm,
    Time,
    Timezone,
    Tn,
    Trees,
    Ua,
    Url,
    Version,
    Vpw,
}

impl ProfileField {
    pub const ALL: [ProfileField; 25] = [
        ProfileField::AppId,
        ProfileField::Box,
        ProfileField::Canvas,
        ProfileField::ClientSize,
        ProfileField::Organization,
        ProfileField::Os,
        ProfileField::Platform,
        ProfileField::Plugins,
        ProfileField::Pmf,
        ProfileField::Protocol,
        ProfileField::Referer,
        ProfileField::Res,
        ProfileField::Rtype,
        ProfileField::Sdkver,
        ProfileField::Status,
        ProfileField::SubVersion,
        ProfileField::Svm,
        ProfileField::Time,
        ProfileField::Timezone,
        ProfileField::Tn,
        ProfileField::Trees,
        ProfileField::Ua,
        ProfileField::Url,
        ProfileField::Version,
        ProfileField::Vpw,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.spec().name == name)
    }

    pub const fn spec(self) -> FieldSpec {
        let (name, cipher, obfuscated_name) = match self {
            ProfileField::AppId => ("appId", CipherKind::Des(*b"uy7mzc4h"), "xx"),
            ProfileField::Box => ("box", CipherKind::None, "jf"),
            ProfileField::Canvas => ("canvas", CipherKind::Des(*b"snrn887t"), "yk"),
            ProfileField::ClientSize => ("clientSize", CipherKind::Des(*b"cpmjjgsu"), "zx"),
            ProfileField::Organization => ("organization", CipherKind::Des(*b"78moqjfc"), "dp"),
            ProfileField::Os => ("os", CipherKind::Des(*b"je6vk6t4"), "pj"),
            ProfileField::Platform => ("platform", CipherKind::Des(*b"pakxhcd2"), "gm"),
            ProfileField::Plugins => ("plugins", CipherKind::Des(*b"v51m3pzl"), "kq"),
            ProfileField::Pmf => ("pmf", CipherKind::Des(*b"2mdeslu3"), "vw"),
            ProfileField::Protocol => ("protocol", CipherKind::None, "protocol"),
            ProfileField::Referer => ("referer", CipherKind::Des(*b"y7bmrjlc"), "ab"),
            ProfileField::Res => ("res", CipherKind::Des(*b"whxqm2a7"), "hf"),
            ProfileField::Rtype => ("rtype", CipherKind::Des(*b"x8o2h2bl"), "lo"),
            ProfileField::Sdkver => ("sdkver", CipherKind::Des(*b"9q3dcxp2"), "sc"),
            ProfileField::Status => ("status", CipherKind::Des(*b"2jbrxxw4"), "an"),
            ProfileField::SubVersion => ("subVersion", CipherKind::Des(*b"eo3i2puh"), "ns"),
            ProfileField::Svm => ("svm", CipherKind::Des(*b"fzj3kaeh"), "qr"),
            ProfileField::Time => ("time", CipherKind::Des(*b"q2t3odsk"), "nb"),
            ProfileField::Timezone => ("timezone", CipherKind::Des(*b"1uv05lj5"), "as"),
            ProfileField::Tn => ("tn", CipherKind::Des(*b"x9nzj1bp"), "py"),
            ProfileField::Trees => ("trees", CipherKind::Des(*b"acfs0xo4"), "pi"),
            ProfileField::Ua => ("ua", CipherKind::Des(*b"k92crp1t"), "bj"),
            ProfileField::Url => ("url", CipherKind::Des(*b"y95hjkoo"), "cf"),
            ProfileField::Version => ("version", CipherKind::None, "version"),
            ProfileField::Vpw => ("vpw", CipherKind::Des(*b"r9924ab5"), "ca"),
        };
        FieldSpec {
            name,
            cipher,
            obfuscated_name,
        }
    }
}

/// Result of running the field cipher over a profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CipheredProfile {
    #[serde(flatten)]
    pub fields: BTreeMap<String, ProfileValue>,
    /// Fields with no table entry, forwarded under their original name.
    #[serde(skip)]
    pub passthrough: Vec<String>,
}

/// Rename and encrypt every field of `profile` according to the field table.
pub fn apply_field_cipher(profile: &DeviceProfile) -> CipheredProfile {
    let mut fields = BTreeMap::new();
    let mut passthrough = Vec::new();

    for (name, value) in profile.iter() {
        match ProfileField::from_name(name) {
            Some(field) => {
                let spec = field.spec();
                let wire_value = match spec.cipher {
                    CipherKind::None => value.clone(),
                    CipherKind::Des(key) => {
                        ProfileValue::Text(encrypt_field(&key, &value.to_string()))
                    }
                };
                fields.insert(spec.obfuscated_name.to_string(), wire_value);
            }
            None => {
                passthrough.push(name.clone());
                fields.insert(name.clone(), value.clone());
            }
        }
    }

    CipheredProfile {
        fields,
        passthrough,
    }
}

/// DES-ECB encrypt `plaintext` and return the base64 ciphertext.
///
/// The plaintext is followed by `8 - len % 8` zero bytes, so an aligned
/// value gains a whole zero block.
pub fn encrypt_field(key: &[u8; DES_BLOCK], plaintext: &str) -> String {
    let cipher = Des::new(GenericArray::from_slice(key));
    let mut data = plaintext.as_bytes().to_vec();
    let pad = DES_BLOCK - data.len() % DES_BLOCK;
    data.resize(data.len() + pad, 0);

    for block in data.chunks_exact_mut(DES_BLOCK) {
        cipher.encrypt_block(GenericArray::from_mut_slice(block));
    }
    STANDARD.encode(data)
}

/// Reverse of [`encrypt_field`]. Returns the zero-padded plaintext bytes.
pub fn decrypt_field(key: &[u8; DES_BLOCK], ciphertext: &str) -> CryptoResult<Vec<u8>> {
    let mut data = STANDARD
        .decode(ciphertext)
        .map_err(|e| CryptoError::Encoding(e.to_string()))?;
    if data.is_empty() || data.len() % DES_BLOCK != 0 {
        return Err(CryptoError::Encoding(format!(
            "ciphertext length {} is not a multiple of {}",
            data.len(),
            DES_BLOCK
        )));
    }

    let cipher = Des::new(GenericArray::from_slice(key));
    for block in data.chunks_exact_mut(DES_BLOCK) {
        cipher.decrypt_block(GenericArray::from_mut_slice(block));
    }
    Ok(data)
}
