//! Portal request signing.
//!
//! Every authenticated portal call carries a `sign` header computed as
//!
//! ```text
//! MD5_hex( HMAC-SHA256_hex( credToken, path + bodyOrQuery + timestamp + context_json ) )
//! ```
//!
//! where `context_json` is the compact JSON of `{platform, timestamp, dId, vName}`
//! in that key order. The timestamp is the current unix time minus two
//! seconds. Both the skew and the double hash are required by the verifier.

use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use serde::Serialize;
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{CryptoError, CryptoResult};

type HmacSha256 = Hmac<Sha256>;

/// Platform code sent in the signing context.
pub const SIGN_PLATFORM: &str = "3";

/// API version sent in the signing context.
pub const SIGN_API_VERSION: &str = "1.0.0";

/// Seconds subtracted from the wall clock for the signing timestamp.
pub const CLOCK_SKEW_SECS: u64 = 2;

/// Inputs of one signature. Built per call and never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureContext<'a> {
    /// URL path, without query.
    pub path: &'a str,
    /// Raw query string for GET (no leading `?`), exact body for POST.
    pub body_or_query: &'a str,
    /// Signing timestamp in unix seconds.
    pub timestamp: u64,
    pub device_id: &'a str,
    pub api_version: &'a str,
}

impl<'a> SignatureContext<'a> {
    /// Context stamped with the current, skewed time.
    pub fn now(path: &'a str, body_or_query: &'a str, device_id: &'a str) -> Self {
        Self::at(path, body_or_query, device_id, signing_timestamp())
    }

    /// Context at an explicit timestamp.
    pub fn at(path: &'a str, body_or_query: &'a str, device_id: &'a str, timestamp: u64) -> Self {
        Self {
            path,
            body_or_query,
            timestamp,
            device_id,
            api_version: SIGN_API_VERSION,
        }
    }
}

/// Key order of this struct is part of the signed string.
#[derive(Serialize)]
struct ContextHeader<'a> {
    platform: &'a str,
    timestamp: String,
    #[serde(rename = "dId")]
    device_id: &'a str,
    #[serde(rename = "vName")]
    api_version: &'a str,
}

/// Headers produced for one signed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub sign: String,
    pub platform: String,
    pub timestamp: String,
    pub device_id: String,
    pub api_version: String,
}

impl SignedHeaders {
    /// Header name/value pairs in wire form.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("sign", self.sign.clone()),
            ("platform", self.platform.clone()),
            ("timestamp", self.timestamp.clone()),
            ("dId", self.device_id.clone()),
            ("vName", self.api_version.clone()),
        ]
    }
}

/// Sign one request with the session's credential token.
pub fn sign_request(cred_token: &str, ctx: &SignatureContext<'_>) -> CryptoResult<SignedHeaders> {
    let timestamp = ctx.timestamp.to_string();
    let header = ContextHeader {
        platform: SIGN_PLATFORM,
        timestamp: timestamp.clone(),
        device_id: ctx.device_id,
        api_version: ctx.api_version,
    };
    let header_json = serde_json::to_string(&header)?;

    let mut mac = HmacSha256::new_from_slice(cred_token.as_bytes())
        .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
    mac.update(ctx.path.as_bytes());
    mac.update(ctx.body_or_query.as_bytes());
    mac.update(timestamp.as_bytes());
    mac.update(header_json.as_bytes());
    let hmac_hex = hex::encode(mac.finalize().into_bytes());

    let sign = hex::encode(Md5::digest(hmac_hex.as_bytes()));

    Ok(SignedHeaders {
        sign,
        platform: SIGN_PLATFORM.to_string(),
        timestamp,
        device_id: ctx.device_id.to_string(),
        api_version: ctx.api_version.to_string(),
    })
}

/// Current unix time in seconds minus [`CLOCK_SKEW_SECS`].
pub fn signing_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
        .saturating_sub(CLOCK_SKEW_SECS)
}
