//! Host profile error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostProfileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid host profile: {0}")]
    Json(#[from] serde_json::Error),
}
