//! Core types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Games whose daily attendance can be performed through the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameCode {
    Arknights,
    Endfield,
}

impl GameCode {
    /// Every supported game, in attendance order.
    pub const ALL: [GameCode; 2] = [GameCode::Arknights, GameCode::Endfield];

    /// The portal `appCode` for this game.
    pub fn as_str(&self) -> &'static str {
        match self {
            GameCode::Arknights => "arknights",
            GameCode::Endfield => "endfield",
        }
    }

    /// Upper-case tag used in report lines.
    pub fn label(&self) -> &'static str {
        match self {
            GameCode::Arknights => "ARKNIGHTS",
            GameCode::Endfield => "ENDFIELD",
        }
    }
}

impl fmt::Display for GameCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "arknights" => Ok(GameCode::Arknights),
            "endfield" => Ok(GameCode::Endfield),
            other => Err(CoreError::UnknownGame(other.to_string())),
        }
    }
}

/// Where the attendance call for a character is routed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttendanceTarget {
    /// One arknights binding. `game_id` is echoed back to the portal verbatim.
    Arknights { uid: String, game_id: serde_json::Value },
    /// One endfield role inside a binding.
    Endfield {
        role_id: String,
        server_id: String,
        channel_name: Option<String>,
    },
}

/// A bound game character discovered for the current account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub game: GameCode,
    pub display_name: String,
    pub target: AttendanceTarget,
}

impl Character {
    /// The portal-side identifier of the character (uid or role id).
    pub fn external_id(&self) -> &str {
        match &self.target {
            AttendanceTarget::Arknights { uid, .. } => uid,
            AttendanceTarget::Endfield { role_id, .. } => role_id,
        }
    }

    /// Server metadata, when the game exposes any.
    pub fn server_meta(&self) -> Option<&str> {
        match &self.target {
            AttendanceTarget::Arknights { .. } => None,
            AttendanceTarget::Endfield { server_id, .. } => Some(server_id),
        }
    }
}

/// Device identifier issued by the fingerprint service.
///
/// An empty value is the degraded identity used when fingerprinting failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The empty identity sent when the fingerprint service was unavailable.
    pub fn degraded() -> Self {
        Self(String::new())
    }

    pub fn is_degraded(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mask an account token for logging as `abcd***wxyz`.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() < 8 {
        return "***".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}
