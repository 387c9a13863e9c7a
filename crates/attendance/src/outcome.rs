//! Result classification and report lines.

use serde::Deserialize;
use serde_json::Value;
use skas_core::Character;
use std::fmt;

use crate::error::AttendanceError;

/// Substring the portal puts in the message of an attendance that was
/// already done today.
///
/// Matched literally against a human-readable, localized message. A wording
/// change on the portal side turns repeat attendances into failures.
pub const DUPLICATE_MARKER: &str = "重复";

const EMPTY_MESSAGE: &str = "OK";
const AWARDS_PREFIX: &str = " | 获得: ";

/// Decoded reply of an attendance endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceReply {
    pub code: Option<i64>,
    pub message: Option<String>,
    /// Kept undecoded so an unexpected award shape cannot fail the reply.
    pub data: Option<Value>,
}

impl AttendanceReply {
    /// Awards listed under `data.awards`. Entries without a resource name
    /// or a count are skipped.
    pub fn awards(&self) -> Vec<Award> {
        self.data
            .as_ref()
            .and_then(|data| data.get("awards"))
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(Award::from_value).collect())
            .unwrap_or_default()
    }
}

/// One reward granted by an attendance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Award {
    pub name: String,
    /// Count as sent, number or string.
    pub count: String,
}

impl Award {
    fn from_value(value: &Value) -> Option<Self> {
        let name = value.get("resource")?.get("name")?.as_str()?.to_string();
        let count = match value.get("count")? {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            _ => return None,
        };
        Some(Award { name, count })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceStatus {
    Success,
    /// Already attended today. Not a failure.
    Info,
    Fail,
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttendanceStatus::Success => f.write_str("SUCCESS"),
            AttendanceStatus::Info => f.write_str("INFO"),
            AttendanceStatus::Fail => f.write_str("FAIL"),
        }
    }
}

/// Classified result of one character's attendance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceOutcome {
    pub status: AttendanceStatus,
    pub message: String,
    pub awards: Vec<Award>,
}

impl AttendanceOutcome {
    /// `code == 0` succeeds, a message carrying [`DUPLICATE_MARKER`] is
    /// informational, anything else fails.
    pub fn classify(reply: AttendanceReply) -> Self {
        let awards = reply.awards();
        let message = reply
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| EMPTY_MESSAGE.to_string());
        let status = if reply.code == Some(0) {
            AttendanceStatus::Success
        } else if message.contains(DUPLICATE_MARKER) {
            AttendanceStatus::Info
        } else {
            AttendanceStatus::Fail
        };

        Self {
            status,
            message,
            awards,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.status == AttendanceStatus::Fail
    }
}

/// `[GAME] name: STATUS - message | 获得: axN,bxM`
pub fn outcome_line(character: &Character, outcome: &AttendanceOutcome) -> String {
    let mut line = format!(
        "[{}] {}: {} - {}",
        character.game.label(),
        character.display_name,
        outcome.status,
        outcome.message
    );
    if !outcome.awards.is_empty() {
        let awards: Vec<String> = outcome
            .awards
            .iter()
            .map(|a| format!("{}x{}", a.name, a.count))
            .collect();
        line.push_str(AWARDS_PREFIX);
        line.push_str(&awards.join(","));
    }
    line
}

pub fn error_line(character: &Character, error: &AttendanceError) -> String {
    format!(
        "[{}] {}: ERROR - {}",
        character.game.label(),
        character.display_name,
        error
    )
}

pub fn fatal_line(error: &AttendanceError) -> String {
    format!("Login/Init Error: {}", error)
}
