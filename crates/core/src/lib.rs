//! Core functionality for the SKAS attendance system.
//!
//! This crate provides the fundamental types, configuration surface and the
//! HTTP transport seam shared by every other crate in the workspace.

pub mod config;
pub mod error;
pub mod logging;
pub mod transport;
pub mod types;

pub use config::{LogFormat, RunConfig};
pub use error::{CoreError, Result};
pub use transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError,
    TransportResult,
};
pub use types::{mask_token, AttendanceTarget, Character, DeviceId, GameCode};
