//! Binding discovery.
//!
//! The portal lists bindings grouped by application code. Arknights
//! bindings map to one character each; an endfield binding holds several
//! roles and maps to one character per role.

use serde::Deserialize;
use serde_json::Value;
use skas_core::{AttendanceTarget, Character, GameCode};
use tracing::{debug, info};

use crate::error::{AttendanceError, AttendanceResult, AuthStage};
use crate::session::{PortalReply, Session};

pub const BINDING_URL: &str = "https://zonai.skland.com/api/v1/game/player/binding";

const UNKNOWN_NAME: &str = "Unknown";

#[derive(Debug, Deserialize)]
struct BindingData {
    #[serde(default)]
    list: Vec<AppBindings>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppBindings {
    #[serde(default)]
    app_code: String,
    #[serde(default)]
    binding_list: Vec<Value>,
}

/// Fetch and flatten the account's bindings.
pub async fn discover(session: &Session) -> AttendanceResult<Vec<Character>> {
    let request = session.signed_get(BINDING_URL)?;
    let reply: PortalReply<BindingData> = session.send(request).await?.json()?;
    if !reply.is_ok() {
        return Err(AttendanceError::auth(AuthStage::Bindings, reply.reason()));
    }

    let characters = flatten(reply.data.map(|d| d.list).unwrap_or_default());
    info!(count = characters.len(), "Bindings discovered");
    Ok(characters)
}

fn flatten(apps: Vec<AppBindings>) -> Vec<Character> {
    let mut characters = Vec::new();
    for app in apps {
        let game = match app.app_code.parse::<GameCode>() {
            Ok(game) => game,
            Err(_) => {
                debug!(app_code = %app.app_code, "Skipping bindings of unsupported app");
                continue;
            }
        };
        for item in &app.binding_list {
            match game {
                GameCode::Arknights => characters.push(arknights_character(item)),
                GameCode::Endfield => characters.extend(endfield_characters(item)),
            }
        }
    }
    characters
}

fn arknights_character(item: &Value) -> Character {
    let uid = text_of(&item["uid"]).unwrap_or_default();
    let display_name = text_of(&item["nickName"])
        .or_else(|| non_empty(&uid))
        .unwrap_or_else(|| UNKNOWN_NAME.to_string());
    Character {
        game: GameCode::Arknights,
        display_name,
        target: AttendanceTarget::Arknights {
            uid,
            game_id: item["gameId"].clone(),
        },
    }
}

fn endfield_characters(item: &Value) -> Vec<Character> {
    let channel_name = text_of(&item["channelName"]);
    let Some(roles) = item["roles"].as_array() else {
        return Vec::new();
    };

    roles
        .iter()
        .map(|role| {
            let role_id = text_of(&role["roleId"]).unwrap_or_default();
            let display_name = text_of(&role["nickname"])
                .or_else(|| non_empty(&role_id))
                .unwrap_or_else(|| UNKNOWN_NAME.to_string());
            Character {
                game: GameCode::Endfield,
                display_name,
                target: AttendanceTarget::Endfield {
                    server_id: text_of(&role["serverId"]).unwrap_or_default(),
                    role_id,
                    channel_name: channel_name.clone(),
                },
            }
        })
        .collect()
}

/// Non-empty string form of a JSON string or number.
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}
