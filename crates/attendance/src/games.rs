//! Per-game attendance calls.

use serde::Serialize;
use skas_core::{AttendanceTarget, Character, HttpRequest};

use crate::error::{AttendanceError, AttendanceResult};
use crate::outcome::{AttendanceOutcome, AttendanceReply};
use crate::session::Session;

pub const ARKNIGHTS_ATTENDANCE_URL: &str = "https://zonai.skland.com/api/v1/game/attendance";
pub const ENDFIELD_ATTENDANCE_URL: &str =
    "https://zonai.skland.com/web/v1/game/endfield/attendance";

/// Header selecting the endfield role an attendance applies to.
pub const ROLE_HEADER: &str = "sk-game-role";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ArknightsBody<'a> {
    game_id: &'a serde_json::Value,
    uid: &'a str,
}

/// Build the signed attendance request for one character.
pub fn attendance_request(
    session: &Session,
    character: &Character,
) -> AttendanceResult<HttpRequest> {
    match &character.target {
        AttendanceTarget::Arknights { uid, game_id } => {
            let body = serde_json::to_string(&ArknightsBody { game_id, uid })
                .map_err(skas_core::TransportError::from)?;
            session.signed_post(ARKNIGHTS_ATTENDANCE_URL, Some(body))
        }
        AttendanceTarget::Endfield {
            role_id, server_id, ..
        } => Ok(session
            .signed_post(ENDFIELD_ATTENDANCE_URL, None)?
            .header(ROLE_HEADER, format!("3_{}_{}", role_id, server_id))),
    }
}

/// Perform one character's attendance and classify the reply.
///
/// Transport and decode failures come back as [`AttendanceError::Call`].
pub async fn attend(
    session: &Session,
    character: &Character,
) -> AttendanceResult<AttendanceOutcome> {
    let request = attendance_request(session, character)?;
    let response = session.send(request).await.map_err(|e| match e {
        AttendanceError::Transport(inner) => AttendanceError::Call(inner),
        other => other,
    })?;
    let reply: AttendanceReply = response.json().map_err(AttendanceError::Call)?;
    Ok(AttendanceOutcome::classify(reply))
}
