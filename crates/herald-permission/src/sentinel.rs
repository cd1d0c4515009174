//! Sentinel rule for host replies
//!
//! A reply counts as granted only when it is exactly the string `"granted"`
//! or the number `0` (the legacy API's granted code). Everything else,
//! including shapes the host was never supposed to return, counts as denied.
//!
//! TODO: report unrecognised replies as their own outcome instead of folding
//! them into `Denied`.

use serde_json::Value;

use crate::state::PermissionState;

/// A host reply before it is mapped onto [`PermissionState`].
pub type RawPermission = Value;

pub const GRANTED_SENTINEL: &str = "granted";

pub fn is_granted(raw: &RawPermission) -> bool {
    match raw {
        Value::String(s) => s == GRANTED_SENTINEL,
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

/// Collapse a reply onto the two terminal states.
pub fn resolve(raw: &RawPermission) -> PermissionState {
    if is_granted(raw) {
        PermissionState::Granted
    } else {
        PermissionState::Denied
    }
}

/// Read a modern permission field. Values outside the vocabulary go through
/// [`resolve`].
pub fn from_field(raw: &RawPermission) -> PermissionState {
    match raw.as_str().map(str::parse::<PermissionState>) {
        Some(Ok(state)) => state,
        _ => {
            tracing::warn!(value = %raw, "Unrecognized permission field value");
            resolve(raw)
        }
    }
}

/// Read a legacy check code through [`crate::LEGACY_CODE_TABLE`]. Integral
/// floats count as codes. Codes outside the table go through [`resolve`].
pub fn from_legacy_code(raw: &RawPermission) -> PermissionState {
    let code = raw
        .as_i64()
        .or_else(|| raw.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64));

    match code.and_then(PermissionState::from_legacy_code) {
        Some(state) => state,
        None => {
            tracing::warn!(value = %raw, "Unrecognized legacy permission code");
            resolve(raw)
        }
    }
}
