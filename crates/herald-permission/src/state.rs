//! Permission vocabulary
//!
//! Every host representation (string field, numeric code, site-mode flag,
//! missing API) is mapped onto [`PermissionState`] before it leaves the crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    /// Notifications may be shown
    Granted,
    /// The user has not decided yet
    Default,
    /// Notifications are blocked
    Denied,
}

/// Legacy numeric check codes, indexed by code value.
pub const LEGACY_CODE_TABLE: [PermissionState; 3] = [
    PermissionState::Granted,
    PermissionState::Default,
    PermissionState::Denied,
];

impl PermissionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionState::Granted => "granted",
            PermissionState::Default => "default",
            PermissionState::Denied => "denied",
        }
    }

    /// Look up a legacy check code. Codes outside the table yield `None`.
    pub fn from_legacy_code(code: i64) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|index| LEGACY_CODE_TABLE.get(index))
            .copied()
    }

    pub fn is_granted(&self) -> bool {
        *self == PermissionState::Granted
    }

    /// Whether the user has already made a decision
    pub fn is_decided(&self) -> bool {
        *self != PermissionState::Default
    }
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionState {
    type Err = UnknownState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "granted" => Ok(PermissionState::Granted),
            "default" => Ok(PermissionState::Default),
            "denied" => Ok(PermissionState::Denied),
            other => Err(UnknownState(other.to_string())),
        }
    }
}
