//! Webhook delivery of run reports.
//!
//! Delivery is best effort: the caller gets an explicit result and decides
//! whether to care. Chat bots that expect a `msgtype` envelope (DingTalk,
//! Feishu) are detected from the URL; every other endpoint receives a plain
//! `{content, message}` object.

use serde::Serialize;
use skas_core::{HttpRequest, HttpTransport, TransportError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Title shown by providers that render one.
pub const REPORT_TITLE: &str = "SKAS Report";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Webhook delivery failed: {0}")]
    Transport(#[from] TransportError),

    #[error("Webhook endpoint answered with HTTP {status}")]
    Rejected { status: u16 },
}

pub type NotifyResult<T> = Result<T, NotifyError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookProvider {
    DingTalk,
    Feishu,
    Generic,
}

impl WebhookProvider {
    /// Detect the provider from a substring of the URL.
    pub fn detect(url: &str) -> Self {
        if url.contains("dingtalk") {
            WebhookProvider::DingTalk
        } else if url.contains("feishu") {
            WebhookProvider::Feishu
        } else {
            WebhookProvider::Generic
        }
    }
}

#[derive(Serialize)]
struct TextBody<'a> {
    content: &'a str,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Payload<'a> {
    Bot {
        msgtype: &'static str,
        text: TextBody<'a>,
        title: &'static str,
        body: &'a str,
    },
    Plain {
        content: &'a str,
        message: &'a str,
    },
}

fn payload(provider: WebhookProvider, content: &str) -> Payload<'_> {
    match provider {
        WebhookProvider::DingTalk | WebhookProvider::Feishu => Payload::Bot {
            msgtype: "text",
            text: TextBody { content },
            title: REPORT_TITLE,
            body: content,
        },
        WebhookProvider::Generic => Payload::Plain {
            content,
            message: content,
        },
    }
}

/// What happened to a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// No webhook configured or nothing to report
    Skipped,
}

pub struct Notifier {
    transport: Arc<dyn HttpTransport>,
    url: Option<String>,
}

impl Notifier {
    pub fn new(transport: Arc<dyn HttpTransport>, url: Option<String>) -> Self {
        Self { transport, url }
    }

    /// Post all report lines, joined by newlines, as one message.
    pub async fn send_report(&self, logs: &[String]) -> NotifyResult<Delivery> {
        let url = match &self.url {
            Some(url) if !logs.is_empty() => url,
            _ => {
                debug!("No webhook delivery");
                return Ok(Delivery::Skipped);
            }
        };

        let content = logs.join("\n");
        let provider = WebhookProvider::detect(url);
        let request = HttpRequest::post(url.as_str()).json(&payload(provider, &content))?;
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(NotifyError::Rejected {
                status: response.status,
            });
        }

        info!(?provider, lines = logs.len(), "Report delivered");
        Ok(Delivery::Sent)
    }
}
