//! Permission error types

use thiserror::Error;

/// Faults reported by the host while it handles a permission request.
///
/// These never reach callers of the negotiator; they are folded into the
/// denied outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Host rejected the permission request: {0}")]
    Rejected(String),

    #[error("Host dropped the permission callback without replying")]
    CallbackDropped,
}

/// Failure outcome of `request_async`. Carries no payload.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Notification permission not granted")]
pub struct NotGranted;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown permission state: {0}")]
pub struct UnknownState(pub String);
