//! Device profile data model.
//!
//! A [`DeviceProfile`] is the ordered field map that is hashed, ciphered and
//! packed for the fingerprint service. Keys are kept in byte-wise order.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A single profile value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProfileValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Nested(DeviceProfile),
}

impl ProfileValue {
    pub fn text(value: impl Into<String>) -> Self {
        ProfileValue::Text(value.into())
    }
}

impl From<&str> for ProfileValue {
    fn from(value: &str) -> Self {
        ProfileValue::Text(value.to_string())
    }
}

impl From<String> for ProfileValue {
    fn from(value: String) -> Self {
        ProfileValue::Text(value)
    }
}

impl From<i64> for ProfileValue {
    fn from(value: i64) -> Self {
        ProfileValue::Integer(value)
    }
}

impl From<f64> for ProfileValue {
    fn from(value: f64) -> Self {
        ProfileValue::Float(value)
    }
}

impl From<DeviceProfile> for ProfileValue {
    fn from(value: DeviceProfile) -> Self {
        ProfileValue::Nested(value)
    }
}

/// String form used as cipher plaintext and in the canonical string.
///
/// Floats and nested maps follow the verifier's own rendering: floats keep a
/// fractional part and switch to `1e+16` / `1e-05` exponent form outside
/// `[1e-4, 1e16)`; nested maps render as `{'key': value, ...}` with quoted
/// text. Nested keys come out in byte-wise order; the verifier keeps
/// insertion order, so nested values are only wire-compatible when both agree.
impl fmt::Display for ProfileValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileValue::Text(s) => f.write_str(s),
            ProfileValue::Integer(n) => write!(f, "{}", n),
            ProfileValue::Float(v) => f.write_str(&format_float(*v)),
            ProfileValue::Nested(profile) => {
                f.write_str("{")?;
                for (i, (key, value)) in profile.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: ", quote(key))?;
                    match value {
                        ProfileValue::Text(s) => f.write_str(&quote(s))?,
                        other => write!(f, "{}", other)?,
                    }
                }
                f.write_str("}")
            }
        }
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Shortest round-trip float rendering with a fractional part for integral
/// values (`12500.0`, not `12500`) and exponent form for very large or very
/// small magnitudes (`1e+16`, `1.5e-05`).
pub(crate) fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .map(|(m, e)| (m, e.parse::<i32>().unwrap_or(0)))
        .unwrap_or((scientific.as_str(), 0));

    if (-4..16).contains(&exponent) {
        let plain = format!("{}", value);
        if plain.contains('.') {
            plain
        } else {
            format!("{}.0", plain)
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    }
}

/// Ordered map of field name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DeviceProfile {
    fields: BTreeMap<String, ProfileValue>,
}

impl DeviceProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field, returning the profile for chaining.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ProfileValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ProfileValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ProfileValue> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in byte-wise key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ProfileValue)> {
        self.fields.iter()
    }
}

impl FromIterator<(String, ProfileValue)> for DeviceProfile {
    fn from_iter<I: IntoIterator<Item = (String, ProfileValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
