//! Backend adapters
//!
//! Each recognised host API is wrapped in a [`Backend`]. The negotiator asks
//! a [`BackendTable`] for the first backend that detects its API instead of
//! branching on the host itself, so supporting a new host API means
//! appending a backend.

use futures_util::FutureExt;
use std::sync::Arc;
use tokio::sync::oneshot;

use crate::error::HostError;
use crate::host::{HostReply, HostSurface};
use crate::sentinel;
use crate::state::PermissionState;

pub trait Backend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the host exposes this backend's API
    fn detect(&self, host: &dyn HostSurface) -> bool;

    /// Current state as reported through this backend. Only meaningful when
    /// [`Self::detect`] is true.
    fn read_state(&self, host: &dyn HostSurface) -> PermissionState;

    /// Issue the host's permission request. Returns `None` without touching
    /// the host when this backend has no request function there.
    fn request(&self, _host: &dyn HostSurface) -> Option<HostReply> {
        None
    }
}

pub struct ModernBackend;

impl Backend for ModernBackend {
    fn name(&self) -> &'static str {
        "modern"
    }

    /// A controller without a permission field does not count as present.
    fn detect(&self, host: &dyn HostSurface) -> bool {
        host.modern()
            .is_some_and(|api| !api.permission().is_null())
    }

    fn read_state(&self, host: &dyn HostSurface) -> PermissionState {
        host.modern()
            .map(|api| sentinel::from_field(&api.permission()))
            .unwrap_or(PermissionState::Granted)
    }

    fn request(&self, host: &dyn HostSurface) -> Option<HostReply> {
        host.modern()
            .filter(|api| api.supports_request())
            .map(|api| api.request_permission())
    }
}

pub struct LegacyNumericBackend;

impl Backend for LegacyNumericBackend {
    fn name(&self) -> &'static str {
        "legacy-numeric"
    }

    fn detect(&self, host: &dyn HostSurface) -> bool {
        host.legacy().is_some()
    }

    fn read_state(&self, host: &dyn HostSurface) -> PermissionState {
        host.legacy()
            .map(|api| sentinel::from_legacy_code(&api.check_permission()))
            .unwrap_or(PermissionState::Granted)
    }

    fn request(&self, host: &dyn HostSurface) -> Option<HostReply> {
        let api = host.legacy().filter(|api| api.supports_request())?;

        let (reply_tx, reply_rx) = oneshot::channel();
        api.request_permission(Box::new(move |raw| {
            let _ = reply_tx.send(raw);
        }));

        Some(
            async move { reply_rx.await.map_err(|_| HostError::CallbackDropped) }.boxed(),
        )
    }
}

/// Mobile platforms grant at the platform level; nothing can be checked.
pub struct MobileImplicitBackend;

impl Backend for MobileImplicitBackend {
    fn name(&self) -> &'static str {
        "mobile-implicit"
    }

    fn detect(&self, host: &dyn HostSurface) -> bool {
        host.has_mobile_marker()
    }

    fn read_state(&self, _host: &dyn HostSurface) -> PermissionState {
        PermissionState::Granted
    }
}

pub struct SiteModeBackend;

impl Backend for SiteModeBackend {
    fn name(&self) -> &'static str {
        "site-mode"
    }

    fn detect(&self, host: &dyn HostSurface) -> bool {
        host.site_mode().is_some()
    }

    fn read_state(&self, host: &dyn HostSurface) -> PermissionState {
        match host.site_mode() {
            Some(flag) if !flag.is_site_mode() => PermissionState::Default,
            _ => PermissionState::Granted,
        }
    }
}

/// Probe orders for state reads and for permission requests.
///
/// State reads prefer the modern field; requests prefer the legacy request
/// function when a host exposes both.
#[derive(Clone)]
pub struct BackendTable {
    state_order: Vec<Arc<dyn Backend>>,
    request_order: Vec<Arc<dyn Backend>>,
}

impl BackendTable {
    pub fn standard() -> Self {
        let modern: Arc<dyn Backend> = Arc::new(ModernBackend);
        let legacy: Arc<dyn Backend> = Arc::new(LegacyNumericBackend);

        Self {
            state_order: vec![
                Arc::clone(&modern),
                Arc::clone(&legacy),
                Arc::new(MobileImplicitBackend),
                Arc::new(SiteModeBackend),
            ],
            request_order: vec![legacy, modern],
        }
    }

    /// Add a backend after all existing ones in both probe orders
    pub fn append(&mut self, backend: Arc<dyn Backend>) {
        self.state_order.push(Arc::clone(&backend));
        self.request_order.push(backend);
    }

    /// First backend that detects its API on the host
    pub fn state_backend(&self, host: &dyn HostSurface) -> Option<&dyn Backend> {
        self.state_order
            .iter()
            .find(|backend| backend.detect(host))
            .map(|backend| &**backend)
    }

    /// Issue at most one host request through the first backend able to make
    /// one, returning its name alongside the pending reply.
    pub fn issue_request(&self, host: &dyn HostSurface) -> Option<(&'static str, HostReply)> {
        self.request_order
            .iter()
            .filter(|backend| backend.detect(host))
            .find_map(|backend| backend.request(host).map(|reply| (backend.name(), reply)))
    }

    pub fn state_order(&self) -> Vec<&'static str> {
        self.state_order.iter().map(|backend| backend.name()).collect()
    }

    pub fn request_order(&self) -> Vec<&'static str> {
        self.request_order
            .iter()
            .map(|backend| backend.name())
            .collect()
    }
}

impl Default for BackendTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_orders() {
        let table = BackendTable::standard();

        assert_eq!(
            table.state_order(),
            vec!["modern", "legacy-numeric", "mobile-implicit", "site-mode"]
        );
        assert_eq!(table.request_order(), vec!["legacy-numeric", "modern"]);
    }

    #[test]
    fn test_append_goes_last() {
        struct Kiosk;

        impl Backend for Kiosk {
            fn name(&self) -> &'static str {
                "kiosk"
            }

            fn detect(&self, _host: &dyn HostSurface) -> bool {
                true
            }

            fn read_state(&self, _host: &dyn HostSurface) -> PermissionState {
                PermissionState::Denied
            }
        }

        struct Bare;
        impl HostSurface for Bare {}

        let mut table = BackendTable::standard();
        table.append(Arc::new(Kiosk));

        assert_eq!(table.state_order().last(), Some(&"kiosk"));
        assert_eq!(table.request_order().last(), Some(&"kiosk"));

        let backend = table.state_backend(&Bare).unwrap();
        assert_eq!(backend.name(), "kiosk");
        assert_eq!(backend.read_state(&Bare), PermissionState::Denied);
        assert!(table.issue_request(&Bare).is_none());
    }
}
