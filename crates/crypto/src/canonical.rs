//! Canonical serialization of device profiles for integrity hashing.
//!
//! Keys are visited in byte-wise order and values are concatenated with no
//! delimiter. Numbers are scaled by 10000 before stringification so the
//! output never depends on locale float formatting. The remote verifier
//! recomputes this string, so the output must match byte-for-byte.

use md5::{Digest, Md5};

use crate::profile::{format_float, DeviceProfile, ProfileValue};

/// Fixed-point scale applied to numeric values.
pub const NUMERIC_SCALE: i64 = 10_000;

/// Produce the canonical string of a profile.
pub fn canonical_string(profile: &DeviceProfile) -> String {
    let mut out = String::new();
    write_canonical(profile, &mut out);
    out
}

/// MD5 hex of the canonical string, sent as the `tn` integrity field.
pub fn integrity_hash(profile: &DeviceProfile) -> String {
    hex::encode(Md5::digest(canonical_string(profile).as_bytes()))
}

fn write_canonical(profile: &DeviceProfile, out: &mut String) {
    for (_, value) in profile.iter() {
        match value {
            ProfileValue::Text(s) => out.push_str(s),
            ProfileValue::Integer(n) => {
                let scaled = i128::from(*n) * i128::from(NUMERIC_SCALE);
                out.push_str(&scaled.to_string());
            }
            ProfileValue::Float(v) => {
                out.push_str(&format_float(v * NUMERIC_SCALE as f64));
            }
            ProfileValue::Nested(inner) => write_canonical(inner, out),
        }
    }
}
