//! Portal session state machine.
//!
//! A session starts `Unauthenticated` with the account token and a device
//! id. [`Session::login`] exchanges the token for a short-lived credential
//! pair and moves it to `Authenticated`; only then can signed requests be
//! built. Each account gets its own session and nothing is shared between
//! sessions.

use serde::Deserialize;
use skas_core::transport::PORTAL_USER_AGENT;
use skas_core::{DeviceId, HttpRequest, HttpResponse, HttpTransport};
use skas_crypto::{sign_request, SignatureContext};
use skas_identity::{resolve_device_id, FingerprintClient};
use std::sync::Arc;
use tracing::{debug, info};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{AttendanceError, AttendanceResult, AuthStage};

/// Application code of the portal client the grant is issued to.
pub const APP_CODE: &str = "4ca99fa6b56cc2ba";

pub const GRANT_URL: &str = "https://as.hypergryph.com/user/oauth2/v2/grant";
pub const CRED_URL: &str = "https://zonai.skland.com/web/v1/user/auth/generate_cred_by_code";

const REQUESTED_WITH: &str = "com.hypergryph.skland";

/// Short-lived credential pair issued by the portal.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    cred: String,
    cred_token: String,
}

impl Credential {
    pub fn new(cred: impl Into<String>, cred_token: impl Into<String>) -> Self {
        Self {
            cred: cred.into(),
            cred_token: cred_token.into(),
        }
    }

    pub fn cred(&self) -> &str {
        &self.cred
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(..)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated(Credential),
}

/// Reply shape shared by the `zonai` endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct PortalReply<T> {
    pub code: Option<i64>,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> PortalReply<T> {
    pub fn is_ok(&self) -> bool {
        self.code == Some(0)
    }

    pub fn reason(&self) -> String {
        self.message.clone().unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct GrantReply {
    status: Option<i64>,
    msg: Option<String>,
    data: Option<GrantData>,
}

#[derive(Debug, Deserialize)]
struct GrantData {
    code: String,
}

#[derive(Debug, Deserialize)]
struct CredData {
    cred: String,
    token: String,
}

/// One account's portal session.
pub struct Session {
    transport: Arc<dyn HttpTransport>,
    token: Zeroizing<String>,
    device_id: DeviceId,
    state: SessionState,
}

impl Session {
    pub fn new(transport: Arc<dyn HttpTransport>, token: &str, device_id: DeviceId) -> Self {
        Self {
            transport,
            token: Zeroizing::new(token.to_string()),
            device_id,
            state: SessionState::Unauthenticated,
        }
    }

    /// Create a session with a device id from the fingerprint service.
    ///
    /// Never fails: an unavailable fingerprint service leaves the session
    /// with the degraded (empty) device id.
    pub async fn open(transport: Arc<dyn HttpTransport>, token: &str) -> Self {
        let fingerprint = FingerprintClient::new(Arc::clone(&transport));
        let device_id = resolve_device_id(&fingerprint).await;
        Self::new(transport, token, device_id)
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    /// Exchange the account token for a credential pair.
    pub async fn login(&mut self) -> AttendanceResult<()> {
        let grant = HttpRequest::post(GRANT_URL)
            .headers(self.base_headers())
            .json(&serde_json::json!({
                "appCode": APP_CODE,
                "token": self.token.as_str(),
                "type": 0,
            }))?;
        let reply: GrantReply = self.send(grant).await?.json()?;
        if reply.status != Some(0) {
            return Err(AttendanceError::auth(
                AuthStage::Grant,
                reply.msg.unwrap_or_default(),
            ));
        }
        let grant_code = reply
            .data
            .map(|d| d.code)
            .ok_or_else(|| AttendanceError::auth(AuthStage::Grant, "missing grant code"))?;
        debug!("Grant code issued");

        let exchange = HttpRequest::post(CRED_URL)
            .headers(self.base_headers())
            .json(&serde_json::json!({ "code": grant_code, "kind": 1 }))?;
        let reply: PortalReply<CredData> = self.send(exchange).await?.json()?;
        if !reply.is_ok() {
            return Err(AttendanceError::auth(AuthStage::Credential, reply.reason()));
        }
        let data = reply
            .data
            .ok_or_else(|| AttendanceError::auth(AuthStage::Credential, "missing credential"))?;

        self.state = SessionState::Authenticated(Credential::new(data.cred, data.token));
        info!(degraded_device = self.device_id.is_degraded(), "Session authenticated");
        Ok(())
    }

    /// Headers sent on every portal call.
    pub fn base_headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("User-Agent", PORTAL_USER_AGENT.to_string()),
            ("Accept-Encoding", "gzip".to_string()),
            ("Connection", "close".to_string()),
            ("dId", self.device_id.as_str().to_string()),
            ("X-Requested-With", REQUESTED_WITH.to_string()),
        ]
    }

    /// Signed GET; the query string of `url` is what gets signed.
    pub fn signed_get(&self, url: &str) -> AttendanceResult<HttpRequest> {
        let (path, query) = split_url(url);
        self.sign(HttpRequest::get(url), path, query)
    }

    /// Signed POST. `body` is signed and sent byte for byte; `None` signs the
    /// empty string and sends no body.
    pub fn signed_post(&self, url: &str, body: Option<String>) -> AttendanceResult<HttpRequest> {
        let (path, _) = split_url(url);
        let signed_body = body.as_deref().unwrap_or("");
        let mut request = self.sign(HttpRequest::post(url), path, signed_body)?;
        request = request.header("Content-Type", "application/json");
        if let Some(body) = body {
            request = request.body(body);
        }
        Ok(request)
    }

    fn sign(
        &self,
        request: HttpRequest,
        path: &str,
        body_or_query: &str,
    ) -> AttendanceResult<HttpRequest> {
        let credential = match &self.state {
            SessionState::Authenticated(credential) => credential,
            SessionState::Unauthenticated => return Err(AttendanceError::NotAuthenticated),
        };
        let ctx = SignatureContext::now(path, body_or_query, self.device_id.as_str());
        let signed = sign_request(&credential.cred_token, &ctx)?;

        Ok(request
            .headers(self.base_headers())
            .header("cred", credential.cred())
            .headers(signed.to_pairs()))
    }

    pub async fn send(&self, request: HttpRequest) -> AttendanceResult<HttpResponse> {
        Ok(self.transport.send(request).await?)
    }
}

/// Split an absolute URL into its path and raw query.
pub(crate) fn split_url(url: &str) -> (&str, &str) {
    let rest = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    let path_and_query = rest.find('/').map(|i| &rest[i..]).unwrap_or("");
    let path_and_query = path_and_query
        .split_once('#')
        .map(|(before, _)| before)
        .unwrap_or(path_and_query);
    path_and_query.split_once('?').unwrap_or((path_and_query, ""))
}
