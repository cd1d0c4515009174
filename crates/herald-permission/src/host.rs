//! Host capability surface
//!
//! The environment the negotiator runs in. Each accessor reports whether one
//! of the recognised notification APIs is exposed, and every accessor
//! defaults to "absent": an empty `impl HostSurface for MyHost {}` describes
//! a host with no permission concept at all.

use futures_util::future::BoxFuture;

use crate::sentinel::RawPermission;
use crate::Result;

/// Deferred reply from a host permission request.
pub type HostReply = BoxFuture<'static, Result<RawPermission>>;

/// Completion callback handed to the legacy request function.
pub type LegacyCallback = Box<dyn FnOnce(RawPermission) + Send + 'static>;

pub trait HostSurface: Send + Sync {
    fn modern(&self) -> Option<&dyn ModernNotificationApi> {
        None
    }

    fn legacy(&self) -> Option<&dyn LegacyNotificationApi> {
        None
    }

    /// Presence-only marker for platforms that grant notifications implicitly
    fn has_mobile_marker(&self) -> bool {
        false
    }

    fn site_mode(&self) -> Option<&dyn SiteModeFlag> {
        None
    }
}

/// Notification controller with a three-value permission field.
pub trait ModernNotificationApi: Send + Sync {
    /// Current value of the permission field
    fn permission(&self) -> RawPermission;

    /// Whether the controller exposes a request function
    fn supports_request(&self) -> bool;

    /// Ask the user. Only called when [`Self::supports_request`] is true.
    fn request_permission(&self) -> HostReply;
}

/// Synchronous numeric check (0 granted, 1 default, 2 denied) with a
/// callback-based request.
pub trait LegacyNotificationApi: Send + Sync {
    fn check_permission(&self) -> RawPermission;

    fn supports_request(&self) -> bool;

    /// Ask the user. The host calls `callback` once when a decision is made.
    fn request_permission(&self, callback: LegacyCallback);
}

pub trait SiteModeFlag: Send + Sync {
    fn is_site_mode(&self) -> bool;
}
