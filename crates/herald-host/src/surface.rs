//! Profile-backed host surface

use futures_util::future::{self, FutureExt};
use parking_lot::{Mutex, RwLock};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use herald_permission::{
    HostError, HostReply, HostSurface, LegacyCallback, LegacyNotificationApi,
    ModernNotificationApi, RawPermission, SiteModeFlag,
};

use crate::profile::{HostProfile, RequestBehavior};
use crate::Result;

/// Serves a [`HostProfile`] as a host capability surface.
///
/// A request answered with a reply also updates the reported permission, the
/// way a real host remembers the user's decision. Every request call is
/// counted.
pub struct ProfileHost {
    modern: Option<ProfileModern>,
    legacy: Option<ProfileLegacy>,
    mobile_marker: bool,
    site_mode: Option<ProfileSiteMode>,
    requests: Arc<AtomicUsize>,
}

impl ProfileHost {
    pub fn new(profile: HostProfile) -> Self {
        let requests = Arc::new(AtomicUsize::new(0));

        Self {
            modern: profile.modern.map(|modern| ProfileModern {
                permission: RwLock::new(modern.permission),
                request: modern.request,
                requests: Arc::clone(&requests),
            }),
            legacy: profile.legacy.map(|legacy| ProfileLegacy {
                code: RwLock::new(legacy.code),
                request: legacy.request,
                unanswered: Mutex::new(Vec::new()),
                requests: Arc::clone(&requests),
            }),
            mobile_marker: profile.mobile_marker,
            site_mode: profile.site_mode.map(ProfileSiteMode),
            requests,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(HostProfile::from_json(json)?))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(HostProfile::load(path)?))
    }

    /// Number of permission request calls the host has received
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Legacy callbacks held by a host that never answers
    pub fn unanswered_count(&self) -> usize {
        self.legacy
            .as_ref()
            .map_or(0, |legacy| legacy.unanswered.lock().len())
    }
}

impl From<HostProfile> for ProfileHost {
    fn from(profile: HostProfile) -> Self {
        Self::new(profile)
    }
}

impl HostSurface for ProfileHost {
    fn modern(&self) -> Option<&dyn ModernNotificationApi> {
        self.modern
            .as_ref()
            .map(|api| api as &dyn ModernNotificationApi)
    }

    fn legacy(&self) -> Option<&dyn LegacyNotificationApi> {
        self.legacy
            .as_ref()
            .map(|api| api as &dyn LegacyNotificationApi)
    }

    fn has_mobile_marker(&self) -> bool {
        self.mobile_marker
    }

    fn site_mode(&self) -> Option<&dyn SiteModeFlag> {
        self.site_mode
            .as_ref()
            .map(|flag| flag as &dyn SiteModeFlag)
    }
}

struct ProfileModern {
    permission: RwLock<RawPermission>,
    request: Option<RequestBehavior>,
    requests: Arc<AtomicUsize>,
}

impl ModernNotificationApi for ProfileModern {
    fn permission(&self) -> RawPermission {
        self.permission.read().clone()
    }

    fn supports_request(&self) -> bool {
        self.request.is_some()
    }

    fn request_permission(&self) -> HostReply {
        self.requests.fetch_add(1, Ordering::SeqCst);

        match &self.request {
            Some(RequestBehavior::Reply(raw)) => {
                *self.permission.write() = raw.clone();
                future::ready(Ok(raw.clone())).boxed()
            }
            Some(RequestBehavior::Reject(reason)) => {
                future::ready(Err(HostError::Rejected(reason.clone()))).boxed()
            }
            Some(RequestBehavior::Never) => future::pending().boxed(),
            None => {
                tracing::warn!("Modern request called on a host without a request function");
                future::ready(Err(HostError::Rejected("unsupported".to_string()))).boxed()
            }
        }
    }
}

struct ProfileLegacy {
    code: RwLock<RawPermission>,
    request: Option<RequestBehavior>,
    /// Callbacks kept alive for a host that never answers. Grows by one per
    /// request and is never drained.
    unanswered: Mutex<Vec<LegacyCallback>>,
    requests: Arc<AtomicUsize>,
}

impl LegacyNotificationApi for ProfileLegacy {
    fn check_permission(&self) -> RawPermission {
        self.code.read().clone()
    }

    fn supports_request(&self) -> bool {
        self.request.is_some()
    }

    fn request_permission(&self, callback: LegacyCallback) {
        self.requests.fetch_add(1, Ordering::SeqCst);

        match &self.request {
            Some(RequestBehavior::Reply(raw)) => {
                if raw.is_i64() {
                    *self.code.write() = raw.clone();
                }
                callback(raw.clone());
            }
            Some(RequestBehavior::Never) => self.unanswered.lock().push(callback),
            Some(RequestBehavior::Reject(reason)) => {
                tracing::debug!(reason = %reason, "Dropping legacy permission callback");
            }
            None => {
                tracing::warn!("Legacy request called on a host without a request function");
            }
        }
    }
}

struct ProfileSiteMode(bool);

impl SiteModeFlag for ProfileSiteMode {
    fn is_site_mode(&self) -> bool {
        self.0
    }
}

#[cfg(test)]
#[allow(deprecated)]
mod tests {
    use super::*;
    use herald_permission::{NotGranted, PermissionNegotiator, PermissionState};
    use std::time::Duration;

    fn negotiator_for(json: &str) -> PermissionNegotiator<ProfileHost> {
        PermissionNegotiator::new(ProfileHost::from_json(json).unwrap())
    }

    #[test]
    fn test_site_mode_only() {
        let negotiator = negotiator_for(r#"{ "site_mode": true }"#);

        assert_eq!(negotiator.current_state(), PermissionState::Granted);
        assert!(negotiator.has_permission());
        assert_eq!(negotiator.active_backend(), Some("site-mode"));
    }

    #[test]
    fn test_legacy_denied_profile() {
        let negotiator = negotiator_for(r#"{ "legacy": { "code": 2, "request": { "reply": 0 } } }"#);
        let granted = Arc::new(AtomicUsize::new(0));
        let denied = Arc::new(AtomicUsize::new(0));
        let (g, d) = (Arc::clone(&granted), Arc::clone(&denied));

        assert_eq!(negotiator.current_state(), PermissionState::Denied);
        negotiator.request_legacy(
            Some(Box::new(move || {
                g.fetch_add(1, Ordering::SeqCst);
            })),
            Some(Box::new(move || {
                d.fetch_add(1, Ordering::SeqCst);
            })),
        );

        assert_eq!(granted.load(Ordering::SeqCst), 0);
        assert_eq!(denied.load(Ordering::SeqCst), 1);
        assert_eq!(negotiator.host().request_count(), 0);
    }

    #[tokio::test]
    async fn test_reply_is_remembered() {
        let negotiator = negotiator_for(
            r#"{ "modern": { "permission": "default", "request": { "reply": "granted" } } }"#,
        );

        assert_eq!(negotiator.current_state(), PermissionState::Default);
        assert_eq!(negotiator.request_async().await, Ok(()));
        assert_eq!(negotiator.current_state(), PermissionState::Granted);

        // Decided now, so no second host call
        assert_eq!(negotiator.request_async().await, Ok(()));
        assert_eq!(negotiator.host().request_count(), 1);
    }

    #[tokio::test]
    async fn test_legacy_reply_updates_code() {
        let negotiator = negotiator_for(r#"{ "legacy": { "code": 1, "request": { "reply": 2 } } }"#);

        assert_eq!(negotiator.request_async().await, Err(NotGranted));
        assert_eq!(negotiator.current_state(), PermissionState::Denied);
    }

    #[tokio::test]
    async fn test_rejected_request() {
        let negotiator = negotiator_for(
            r#"{ "modern": { "permission": "default", "request": { "reject": "blocked" } } }"#,
        );
        assert_eq!(negotiator.request_async().await, Err(NotGranted));
        assert_eq!(negotiator.current_state(), PermissionState::Default);

        let negotiator =
            negotiator_for(r#"{ "legacy": { "code": 1, "request": { "reject": "blocked" } } }"#);
        assert_eq!(negotiator.request_async().await, Err(NotGranted));
    }

    #[tokio::test]
    async fn test_never_answering_host_stays_pending() {
        let negotiator = negotiator_for(r#"{ "legacy": { "code": 1, "request": "never" } }"#);

        let pending = negotiator.request_async();
        let outcome = tokio::time::timeout(Duration::from_millis(50), pending).await;

        assert!(outcome.is_err());
        assert_eq!(negotiator.host().request_count(), 1);
        assert_eq!(negotiator.host().unanswered_count(), 1);
    }

    #[test]
    fn test_request_without_function_fails_open() {
        let negotiator = negotiator_for(r#"{ "modern": { "permission": "default" } }"#);

        assert_eq!(negotiator.current_state(), PermissionState::Default);
        assert_eq!(negotiator.request_async().now_or_never(), Some(Ok(())));
        assert_eq!(negotiator.host().request_count(), 0);
    }

    #[test]
    fn test_bare_profile() {
        let negotiator = PermissionNegotiator::new(ProfileHost::from(HostProfile::bare()));

        assert!(!negotiator.is_supported());
        assert!(negotiator.has_permission());
    }
}
