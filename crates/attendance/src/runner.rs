//! Per-account attendance run.
//!
//! Login, binding discovery, then one attendance call per enabled
//! character, strictly in that order and one call at a time. A failed
//! login or discovery ends the run for the account; a failed character
//! call is recorded and the next character is attempted.

use skas_core::{Character, GameCode, HttpTransport};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::bindings::discover;
use crate::error::AttendanceError;
use crate::games::attend;
use crate::outcome::{error_line, fatal_line, outcome_line, AttendanceOutcome};
use crate::session::Session;

/// Aggregated result of one account's run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    /// False once any character failed or the session could not start.
    pub success: bool,
    /// Report lines in the order they were produced.
    pub logs: Vec<String>,
}

impl Default for SessionReport {
    fn default() -> Self {
        Self {
            success: true,
            logs: Vec::new(),
        }
    }
}

impl SessionReport {
    fn push(&mut self, line: String) {
        debug!("{}", line);
        self.logs.push(line);
    }

    fn record(&mut self, character: &Character, outcome: &AttendanceOutcome) {
        if outcome.is_failure() {
            self.success = false;
        }
        debug!(
            game = %character.game,
            id = character.external_id(),
            server = ?character.server_meta(),
            failure = outcome.is_failure(),
            "Attendance call answered"
        );
        self.push(outcome_line(character, outcome));
    }

    fn record_error(&mut self, character: &Character, error: &AttendanceError) {
        warn!(
            game = %character.game,
            id = character.external_id(),
            server = ?character.server_meta(),
            fatal = error.is_session_fatal(),
            error = %error,
            "Attendance call failed"
        );
        self.success = false;
        self.push(error_line(character, error));
    }

    fn record_fatal(&mut self, error: &AttendanceError) {
        warn!(fatal = error.is_session_fatal(), error = %error, "Session aborted");
        self.success = false;
        self.push(fatal_line(error));
    }
}

/// Runs attendance for accounts over a shared transport.
pub struct AttendanceRunner {
    transport: Arc<dyn HttpTransport>,
    enabled_games: Vec<GameCode>,
}

impl AttendanceRunner {
    pub fn new(transport: Arc<dyn HttpTransport>, enabled_games: Vec<GameCode>) -> Self {
        Self {
            transport,
            enabled_games,
        }
    }

    pub fn is_enabled(&self, game: GameCode) -> bool {
        self.enabled_games.contains(&game)
    }

    /// Run one account to completion. Never fails; problems end up in the report.
    pub async fn run(&self, token: &str) -> SessionReport {
        let mut session = Session::open(Arc::clone(&self.transport), token).await;
        self.run_session(&mut session).await
    }

    /// Run an already opened session.
    pub async fn run_session(&self, session: &mut Session) -> SessionReport {
        let mut report = SessionReport::default();

        let characters = match self.prepare(session).await {
            Ok(characters) => characters,
            Err(e) => {
                report.record_fatal(&e);
                return report;
            }
        };

        for character in characters.iter().filter(|c| self.is_enabled(c.game)) {
            match attend(session, character).await {
                Ok(outcome) => report.record(character, &outcome),
                Err(e) => report.record_error(character, &e),
            }
        }
        report
    }

    async fn prepare(&self, session: &mut Session) -> Result<Vec<Character>, AttendanceError> {
        session.login().await?;
        discover(session).await
    }
}
