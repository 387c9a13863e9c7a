//! Known-answer vectors for the fingerprint field cipher.
//!
//! Computed independently with single-key DES-ECB over the zero-padded
//! string form of each value.

use crate::field_cipher::{apply_field_cipher, encrypt_field, CipherKind, ProfileField};
use crate::profile::{DeviceProfile, ProfileValue};

/// A field cipher test vector.
struct FieldVector {
    field: ProfileField,
    plaintext: &'static str,
    expected_b64: &'static str,
}

const FIELD_VECTORS: &[FieldVector] = &[
    FieldVector {
        field: ProfileField::AppId,
        plaintext: "default",
        expected_b64: "Xoz/PL65pzA=",
    },
    FieldVector {
        field: ProfileField::Os,
        plaintext: "web",
        expected_b64: "qeDGcpUpK4Y=",
    },
    // Block-aligned value: a full zero block is appended
    FieldVector {
        field: ProfileField::Canvas,
        plaintext: "259ffe69",
        expected_b64: "I6evoagk0jL0RCGjelJAmw==",
    },
    FieldVector {
        field: ProfileField::Timezone,
        plaintext: "-480",
        expected_b64: "ZiEGW6ynU0Q=",
    },
    FieldVector {
        field: ProfileField::Referer,
        plaintext: "",
        expected_b64: "jYTfqbaQNrY=",
    },
];

fn key_of(field: ProfileField) -> [u8; 8] {
    match field.spec().cipher {
        CipherKind::Des(key) => key,
        CipherKind::None => panic!("{:?} is not encrypted", field),
    }
}

#[test]
fn test_field_vectors() {
    for vector in FIELD_VECTORS {
        assert_eq!(
            encrypt_field(&key_of(vector.field), vector.plaintext),
            vector.expected_b64,
            "vector for {:?}",
            vector.field
        );
    }
}

#[test]
fn test_profile_level_vectors() {
    let profile = DeviceProfile::new()
        .with("appId", "default")
        .with("os", "web")
        .with("timezone", -480i64)
        .with("version", "3.0.0");
    let ciphered = apply_field_cipher(&profile);

    assert_eq!(ciphered.fields.get("xx"), Some(&ProfileValue::text("Xoz/PL65pzA=")));
    assert_eq!(ciphered.fields.get("pj"), Some(&ProfileValue::text("qeDGcpUpK4Y=")));
    assert_eq!(ciphered.fields.get("as"), Some(&ProfileValue::text("ZiEGW6ynU0Q=")));
    assert_eq!(ciphered.fields.get("version"), Some(&ProfileValue::text("3.0.0")));
    assert!(ciphered.passthrough.is_empty());
}
