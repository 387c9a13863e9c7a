//! Test utilities for scenario tests

use async_trait::async_trait;
use skas_attendance::{BINDING_URL, CRED_URL, GRANT_URL};
use skas_core::{HttpRequest, HttpResponse, HttpTransport, TransportError, TransportResult};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, Once};

static TRACING: Once = Once::new();

/// Install a test subscriber once per process. Honors `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Transport answering from canned responses keyed by URL (query ignored).
///
/// Responses queued for the same URL are served in order; the last one
/// repeats. URLs without a script fail like an unreachable host. Every
/// request is recorded.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<HashMap<String, VecDeque<HttpResponse>>>,
    sent: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a 200 response with a JSON body.
    pub fn on(self: &Arc<Self>, url: &str, body: serde_json::Value) -> Arc<Self> {
        self.on_raw(url, 200, &body.to_string())
    }

    pub fn on_raw(self: &Arc<Self>, url: &str, status: u16, body: &str) -> Arc<Self> {
        self.script
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(HttpResponse::new(status, body));
        Arc::clone(self)
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn requests_to(&self, url: &str) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| base_url(&r.url) == url)
            .collect()
    }
}

fn base_url(url: &str) -> &str {
    url.split_once('?').map(|(base, _)| base).unwrap_or(url)
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> TransportResult<HttpResponse> {
        let url = base_url(&request.url).to_string();
        self.sent.lock().unwrap().push(request);

        let mut script = self.script.lock().unwrap();
        let queue = script.get_mut(&url).ok_or_else(|| TransportError::Request {
            url: url.clone(),
            reason: "no route to host".to_string(),
        })?;
        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        response.ok_or(TransportError::Request {
            url,
            reason: "empty script".to_string(),
        })
    }
}

/// Grant and credential exchange both succeed.
pub fn scripted_login(
    transport: &Arc<ScriptedTransport>,
    cred_token: &str,
) -> Arc<ScriptedTransport> {
    transport
        .on(GRANT_URL, serde_json::json!({"status": 0, "data": {"code": "grant-code"}}))
        .on(
            CRED_URL,
            serde_json::json!({"code": 0, "data": {"cred": "cred-value", "token": cred_token}}),
        )
}

/// Binding list with one arknights character and one endfield role.
pub fn two_game_bindings() -> serde_json::Value {
    serde_json::json!({
        "code": 0,
        "message": "OK",
        "data": {"list": [
            {"appCode": "arknights", "bindingList": [
                {"uid": "10001", "gameId": 1, "nickName": "Doctor", "channelName": "官服"}
            ]},
            {"appCode": "endfield", "bindingList": [
                {"channelName": "官服", "roles": [
                    {"roleId": "20001", "serverId": "1", "nickname": "Endministrator"}
                ]}
            ]}
        ]}
    })
}

pub fn scripted_bindings(transport: &Arc<ScriptedTransport>) -> Arc<ScriptedTransport> {
    transport.on(BINDING_URL, two_game_bindings())
}
