//! SKAS daily attendance runner.
//!
//! Reads accounts and options from the environment, runs every account in
//! turn, prints the report and optionally posts it to a webhook. Exits
//! non-zero when any account reported a failure.

use anyhow::Context;
use skas_attendance::AttendanceRunner;
use skas_core::{logging, mask_token, HttpTransport, ReqwestTransport, RunConfig};
use skas_notify::{Delivery, Notifier};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let config = match RunConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            logging::init();
            error!(error = %e, "Invalid configuration");
            return Ok(ExitCode::FAILURE);
        }
    };
    logging::init_with(config.log_format);

    for name in &config.ignored_games {
        warn!(game = %name, "Ignoring unsupported game in ENABLE_GAMES");
    }
    info!(
        accounts = config.tokens.len(),
        games = ?config.enabled_games,
        timeout_secs = config.http_timeout.as_secs(),
        "Starting attendance run"
    );

    let transport: Arc<dyn HttpTransport> = Arc::new(
        ReqwestTransport::new(config.http_timeout).context("failed to build HTTP client")?,
    );
    let runner = AttendanceRunner::new(Arc::clone(&transport), config.enabled_games.clone());

    let mut all_logs = Vec::new();
    let mut all_success = true;
    for (idx, token) in config.tokens.iter().enumerate() {
        println!("Processing Account {}: {}", idx + 1, mask_token(token));
        let report = runner.run(token).await;
        if !report.success {
            all_success = false;
        }
        for line in &report.logs {
            println!("{}", line);
        }
        all_logs.extend(report.logs);
    }

    let notifier = Notifier::new(transport, config.webhook_url.clone());
    match notifier.send_report(&all_logs).await {
        Ok(Delivery::Sent) => info!("Webhook notified"),
        Ok(Delivery::Skipped) => {}
        Err(e) => warn!(error = %e, "Webhook delivery failed"),
    }

    if all_success {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
