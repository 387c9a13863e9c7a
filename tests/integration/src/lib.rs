//! End-to-end scenarios for the attendance flow
//!
//! This test suite drives the real session, signer and orchestrator against
//! a scripted transport and validates:
//! - Session-fatal login failures (no attendance calls)
//! - Enabled-game filtering
//! - Report lines for awards and repeat attendances
//! - Degraded device identity when fingerprinting fails
//! - Signatures reproducible by the receiving side

pub mod test_utils;

#[cfg(test)]
mod attendance_scenarios;

#[cfg(test)]
mod signing_scenarios;
