//! Simulated device profile.
//!
//! The profile describes a fixed desktop Edge browser. Nothing is sampled
//! from a real environment; only the time-derived and random fields change
//! between requests.

use chrono::Local;
use md5::{Digest, Md5};
use skas_crypto::{integrity_hash, DeviceProfile, ProfileValue};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Organization the fingerprint SDK is registered under.
pub const ORGANIZATION: &str = "UWXspnCCJN4sfYlNfqps";

/// Fingerprint SDK application id.
pub const APP_ID: &str = "default";

/// Operating system tag of the web SDK.
pub const SDK_OS: &str = "web";

const PROTOCOL: i64 = 102;
const SDK_VERSION: &str = "3.0.0";
const SUB_VERSION: &str = "1.0.0";
const RTYPE: &str = "all";
const SMID_SALT: &str = "smsk_web_";

#[derive(Debug, Clone, Copy)]
enum Baseline {
    Text(&'static str),
    Integer(i64),
}

/// Static browser environment reported with every profile.
const BROWSER_ENV: [(&str, Baseline); 10] = [
    ("plugins", Baseline::Text("MicrosoftEdgePDFPluginPortableDocumentFormatinternal-pdf-viewer1,MicrosoftEdgePDFViewermhjfbmdgcfjbbpaeojofohoefgiehjai1")),
    ("ua", Baseline::Text("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/129.0.0.0 Safari/537.36 Edg/129.0.0.0")),
    ("canvas", Baseline::Text("259ffe69")),
    ("timezone", Baseline::Integer(-480)),
    ("platform", Baseline::Text("Win32")),
    ("url", Baseline::Text("https://www.skland.com/")),
    ("referer", Baseline::Text("")),
    ("res", Baseline::Text("1920_1080_24_1.25")),
    ("clientSize", Baseline::Text("0_0_1080_1920_1920_1080_1920_1080")),
    ("status", Baseline::Text("0011")),
];

/// Per-request values mixed into the baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileInputs {
    /// Current epoch milliseconds, reported as `svm` and `pmf`.
    pub now_ms: i64,
    /// Local wall-clock time as `YYYYmmddHHMMSS`.
    pub local_time: String,
    pub vpw: String,
    pub trees: String,
    /// Random seed of the `smid` token.
    pub smid_seed: String,
}

impl ProfileInputs {
    /// Inputs drawn from the clock and fresh UUIDs.
    pub fn fresh() -> Self {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);
        Self {
            now_ms,
            local_time: Local::now().format("%Y%m%d%H%M%S").to_string(),
            vpw: Uuid::new_v4().to_string(),
            trees: Uuid::new_v4().to_string(),
            smid_seed: Uuid::new_v4().to_string(),
        }
    }
}

/// Build the complete profile, including its `tn` integrity hash.
pub fn assemble_profile(inputs: &ProfileInputs) -> DeviceProfile {
    let mut profile: DeviceProfile = BROWSER_ENV
        .iter()
        .map(|(name, value)| {
            let value = match value {
                Baseline::Text(s) => ProfileValue::text(*s),
                Baseline::Integer(n) => ProfileValue::Integer(*n),
            };
            (name.to_string(), value)
        })
        .collect();

    profile.insert("vpw", inputs.vpw.clone());
    profile.insert("svm", inputs.now_ms);
    profile.insert("trees", inputs.trees.clone());
    profile.insert("pmf", inputs.now_ms);

    profile.insert("protocol", PROTOCOL);
    profile.insert("organization", ORGANIZATION);
    profile.insert("appId", APP_ID);
    profile.insert("os", SDK_OS);
    profile.insert("version", SDK_VERSION);
    profile.insert("sdkver", SDK_VERSION);
    profile.insert("box", "");
    profile.insert("rtype", RTYPE);
    profile.insert("smid", smid(&inputs.local_time, &inputs.smid_seed));
    profile.insert("subVersion", SUB_VERSION);
    profile.insert("time", 0i64);

    let tn = integrity_hash(&profile);
    profile.insert("tn", tn);
    profile
}

/// Build the SDK `smid` token.
///
/// `local_time + md5(seed) + "00"`, followed by the first 14 hex chars of
/// `md5("smsk_web_" + that)` and a trailing `"0"`.
pub fn smid(local_time: &str, seed: &str) -> String {
    let base = format!(
        "{}{}00",
        local_time,
        hex::encode(Md5::digest(seed.as_bytes()))
    );
    let check = hex::encode(Md5::digest(format!("{}{}", SMID_SALT, base).as_bytes()));
    format!("{}{}0", base, &check[..14])
}
