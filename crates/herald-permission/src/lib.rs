//! HERALD Permission Negotiation
//!
//! Resolves "may this application show desktop notifications" across hosts
//! that expose incompatible permission APIs:
//! - Modern controller with a string permission field and a deferred request
//! - Legacy numeric check (0/1/2) with a callback request
//! - Mobile hosts that grant implicitly
//! - Site-mode hosts exposing only a boolean flag
//!
//! Hosts with none of these are treated as always permitted (fail-open).

mod backend;
mod error;
mod host;
mod negotiator;
pub mod sentinel;
mod state;

pub use backend::{
    Backend, BackendTable, LegacyNumericBackend, MobileImplicitBackend, ModernBackend,
    SiteModeBackend,
};
pub use error::{HostError, NotGranted, UnknownState};
pub use host::{
    HostReply, HostSurface, LegacyCallback, LegacyNotificationApi, ModernNotificationApi,
    SiteModeFlag,
};
pub use negotiator::{PermissionCallback, PermissionNegotiator};
pub use sentinel::RawPermission;
pub use state::{PermissionState, LEGACY_CODE_TABLE};

pub type Result<T> = std::result::Result<T, HostError>;
