//! Configuration management for SKAS.
//!
//! The whole surface comes from the process environment so the runner can be
//! driven from a CI secret store without a config file.

use std::time::Duration;

use crate::error::{CoreError, Result};
use crate::types::GameCode;

pub const ENV_TOKENS: &str = "SKYLAND_TOKEN";
pub const ENV_TOKENS_ALIAS: &str = "SKYLAND_TOKENS";
pub const ENV_ENABLE_GAMES: &str = "ENABLE_GAMES";
pub const ENV_WEBHOOK_URL: &str = "WEBHOOK_URL";
pub const ENV_HTTP_TIMEOUT: &str = "SKAS_HTTP_TIMEOUT_SECS";
pub const ENV_LOG_FORMAT: &str = "SKAS_LOG_FORMAT";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Portal account tokens, one session each.
    pub tokens: Vec<String>,
    /// Games to sign in for. Characters of other games are skipped.
    pub enabled_games: Vec<GameCode>,
    /// Entries of `ENABLE_GAMES` that did not name a supported game.
    pub ignored_games: Vec<String>,
    pub webhook_url: Option<String>,
    /// Upper bound on every single HTTP call.
    pub http_timeout: Duration,
    pub log_format: LogFormat,
}

impl RunConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_tokens = lookup(ENV_TOKENS)
            .or_else(|| lookup(ENV_TOKENS_ALIAS))
            .unwrap_or_default();
        let tokens = split_list(&raw_tokens);
        if tokens.is_empty() {
            return Err(CoreError::Config(format!(
                "no tokens found in {}",
                ENV_TOKENS
            )));
        }

        let raw_games = lookup(ENV_ENABLE_GAMES).unwrap_or_else(|| "arknights,endfield".into());
        let mut enabled_games = Vec::new();
        let mut ignored_games = Vec::new();
        for name in split_list(&raw_games) {
            match name.parse::<GameCode>() {
                Ok(game) if !enabled_games.contains(&game) => enabled_games.push(game),
                Ok(_) => {}
                Err(_) => ignored_games.push(name),
            }
        }

        let webhook_url = lookup(ENV_WEBHOOK_URL)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        let http_timeout = match lookup(ENV_HTTP_TIMEOUT) {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    CoreError::Config(format!("{} must be a number of seconds", ENV_HTTP_TIMEOUT))
                })?;
                if secs == 0 {
                    return Err(CoreError::Config(format!(
                        "{} must be greater than zero",
                        ENV_HTTP_TIMEOUT
                    )));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let log_format = match lookup(ENV_LOG_FORMAT).as_deref().map(str::trim) {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            tokens,
            enabled_games,
            ignored_games,
            webhook_url,
            http_timeout,
            log_format,
        })
    }

    pub fn is_enabled(&self, game: GameCode) -> bool {
        self.enabled_games.contains(&game)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
