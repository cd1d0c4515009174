//! Host profile description
//!
//! ```json
//! {
//!   "modern": { "permission": "default", "request": { "reply": "granted" } },
//!   "legacy": { "code": 1, "request": "never" },
//!   "mobile_marker": false,
//!   "site_mode": true
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use herald_permission::RawPermission;

use crate::Result;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostProfile {
    pub modern: Option<ModernProfile>,
    pub legacy: Option<LegacyProfile>,
    pub mobile_marker: bool,
    /// Site-mode flag value; `None` when the host has no such flag
    pub site_mode: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModernProfile {
    /// Initial value of the permission field
    pub permission: RawPermission,
    /// `None` when the controller has no request function
    #[serde(default)]
    pub request: Option<RequestBehavior>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyProfile {
    /// Initial numeric check code
    pub code: RawPermission,
    #[serde(default)]
    pub request: Option<RequestBehavior>,
}

/// How the host answers a permission request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestBehavior {
    /// Reply with this raw value
    Reply(RawPermission),
    /// Fail the request. The legacy API has no failure channel, so there the
    /// callback is dropped unanswered.
    Reject(String),
    /// Never answer
    Never,
}

impl HostProfile {
    /// A host with no permission concept
    pub fn bare() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let profile = Self::from_json(&contents)?;

        tracing::debug!(path = %path.as_ref().display(), "Loaded host profile");

        Ok(profile)
    }
}
