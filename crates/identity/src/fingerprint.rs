//! Fingerprint service client.
//!
//! One call per portal session: build a fresh profile, cipher and pack it,
//! attach the RSA envelope and exchange it for a device id.

use serde::{Deserialize, Serialize};
use skas_core::{DeviceId, HttpRequest, HttpTransport};
use skas_crypto::{apply_field_cipher, pack, SessionEnvelope};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::device::{assemble_profile, ProfileInputs, APP_ID, ORGANIZATION, SDK_OS};
use crate::error::{IdentityError, IdentityResult};

pub const FINGERPRINT_URL: &str = "https://fp-it.portal101.cn/deviceprofile/v4";

/// `code` value of an accepted profile.
pub const FINGERPRINT_SUCCESS_CODE: i64 = 1100;

/// Prefix the portal expects in front of the issued device id.
const DEVICE_ID_PREFIX: &str = "B";

const COMPRESS_GZIP: i64 = 2;
const ENCODE_AES_HEX: i64 = 5;

/// Request body of the fingerprint endpoint.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FingerprintRequest {
    pub app_id: String,
    pub compress: i64,
    pub data: String,
    pub encode: i64,
    pub ep: String,
    pub organization: String,
    pub os: String,
}

#[derive(Debug, Deserialize)]
struct FingerprintResponse {
    code: i64,
    #[serde(default)]
    detail: Option<FingerprintDetail>,
}

#[derive(Debug, Deserialize)]
struct FingerprintDetail {
    #[serde(rename = "deviceId")]
    device_id: Option<String>,
}

/// Client for the remote fingerprint endpoint.
pub struct FingerprintClient {
    transport: Arc<dyn HttpTransport>,
    url: String,
}

impl FingerprintClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_url(transport, FINGERPRINT_URL)
    }

    pub fn with_url(transport: Arc<dyn HttpTransport>, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
        }
    }

    /// Build the request body for a profile built from `inputs`.
    pub fn build_request(inputs: &ProfileInputs) -> IdentityResult<FingerprintRequest> {
        let profile = assemble_profile(inputs);
        let ciphered = apply_field_cipher(&profile);
        if !ciphered.passthrough.is_empty() {
            debug!(fields = ?ciphered.passthrough, "Profile fields sent without cipher");
        }

        let envelope = SessionEnvelope::generate()?;
        let data = pack(&ciphered, &envelope.secret)?;

        Ok(FingerprintRequest {
            app_id: APP_ID.to_string(),
            compress: COMPRESS_GZIP,
            data,
            encode: ENCODE_AES_HEX,
            ep: envelope.ep,
            organization: ORGANIZATION.to_string(),
            os: SDK_OS.to_string(),
        })
    }

    /// Exchange a freshly built profile for a device id.
    pub async fn fetch(&self) -> IdentityResult<DeviceId> {
        let body = Self::build_request(&ProfileInputs::fresh())?;
        let request = HttpRequest::post(&self.url).json(&body)?;
        let response = self.transport.send(request).await?;
        let parsed: FingerprintResponse = response.json()?;

        if parsed.code != FINGERPRINT_SUCCESS_CODE {
            return Err(IdentityError::Rejected { code: parsed.code });
        }

        let device_id = parsed
            .detail
            .and_then(|d| d.device_id)
            .filter(|id| !id.is_empty())
            .ok_or(IdentityError::MissingDeviceId)?;

        Ok(DeviceId::new(format!("{}{}", DEVICE_ID_PREFIX, device_id)))
    }
}

/// Obtain a device id, degrading to the empty id on any failure.
pub async fn resolve_device_id(client: &FingerprintClient) -> DeviceId {
    match client.fetch().await {
        Ok(device_id) => {
            info!("Device identity issued");
            device_id
        }
        Err(e) => {
            warn!(error = %e, "Fingerprint failed, continuing with degraded device identity");
            DeviceId::degraded()
        }
    }
}
