//! HTTP transport seam.
//!
//! Every remote call in the workspace (fingerprint service, portal API,
//! webhook) goes through [`HttpTransport`], one request at a time. The
//! production implementation wraps a `reqwest::Client` with a bounded
//! per-call timeout; tests substitute a scripted transport.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// User agent presented to the portal, matching its Android web view.
pub const PORTAL_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 12; SKAS/1.0) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/101.0.4951.61 Mobile Safari/537.36";

/// Errors raised while performing an HTTP call.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, TLS or protocol failure
    #[error("Request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    /// The call did not complete within the configured timeout
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// The response body was not the JSON shape expected
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Building the underlying client failed
    #[error("Client setup failed: {0}")]
    Setup(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A fully prepared outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Raw body. Sent as-is so the bytes on the wire match what was signed.
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Attach a JSON body serialized compactly.
    pub fn json<T: serde::Serialize + ?Sized>(self, body: &T) -> TransportResult<Self> {
        let raw = serde_json::to_string(body)?;
        Ok(self.header("Content-Type", "application/json").body(raw))
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set a header, replacing any previous value with the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            slot.1 = value;
        } else {
            self.headers.push((name, value));
        }
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self = self.header(name, value);
        }
        self
    }

    /// Look up a header value by case-insensitive name.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status and raw body of a completed call.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> TransportResult<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A single-request HTTP boundary.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform one request and return its response, whatever the status code.
    async fn send(&self, request: HttpRequest) -> TransportResult<HttpResponse>;
}

/// Implementation of [`HttpTransport`] on top of `reqwest`.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport whose calls are each bounded by `timeout`.
    pub fn new(timeout: Duration) -> TransportResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(PORTAL_USER_AGENT)
            .build()
            .map_err(|e| TransportError::Setup(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> TransportResult<HttpResponse> {
        let url = request.url.clone();
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| map_reqwest(&url, e))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| map_reqwest(&url, e))?;
        debug!(url = %url, status, "HTTP call completed");

        Ok(HttpResponse { status, body })
    }
}

fn map_reqwest(url: &str, err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else {
        TransportError::Request {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}
