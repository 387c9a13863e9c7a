//! Portal session and daily attendance for SKAS.
//!
//! [`Session`] holds one account's login state and signs requests;
//! [`AttendanceRunner`] drives a session through login, binding discovery
//! and the per-character attendance calls, producing a [`SessionReport`].

pub mod bindings;
pub mod error;
pub mod games;
pub mod outcome;
pub mod runner;
pub mod session;

#[cfg(test)]
mod testing;

pub use bindings::{discover, BINDING_URL};
pub use error::{AttendanceError, AttendanceResult, AuthStage};
pub use games::{
    attend, attendance_request, ARKNIGHTS_ATTENDANCE_URL, ENDFIELD_ATTENDANCE_URL, ROLE_HEADER,
};
pub use outcome::{
    error_line, fatal_line, outcome_line, AttendanceOutcome, AttendanceReply, AttendanceStatus,
    Award, DUPLICATE_MARKER,
};
pub use runner::{AttendanceRunner, SessionReport};
pub use session::{Credential, Session, SessionState, APP_CODE, CRED_URL, GRANT_URL};
