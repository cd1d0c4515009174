//! Permission negotiator
//!
//! Both request surfaces (`request_legacy` and `request_async`) are thin
//! adapters over one private `negotiate` primitive, so they always pick the
//! same backend and classify the reply the same way.
//!
//! A host request that never completes keeps the negotiation pending
//! forever. Nothing here times out; callers that need a bound must apply
//! their own (for example `tokio::time::timeout` around `request_async`).

use futures_util::future::{self, BoxFuture};
use futures_util::FutureExt;
use std::future::Future;

use crate::backend::BackendTable;
use crate::error::NotGranted;
use crate::host::HostSurface;
use crate::sentinel;
use crate::state::PermissionState;

/// Callback accepted by the legacy request surface
pub type PermissionCallback = Box<dyn FnOnce() + Send + 'static>;

pub struct PermissionNegotiator<H> {
    host: H,
    backends: BackendTable,
}

impl<H: HostSurface> PermissionNegotiator<H> {
    pub fn new(host: H) -> Self {
        Self::with_backends(host, BackendTable::standard())
    }

    pub fn with_backends(host: H, backends: BackendTable) -> Self {
        Self { host, backends }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Current permission state. Hosts with no recognised API read as granted.
    pub fn current_state(&self) -> PermissionState {
        match self.backends.state_backend(&self.host) {
            Some(backend) => {
                let state = backend.read_state(&self.host);
                tracing::trace!(backend = backend.name(), state = %state, "Read permission state");
                state
            }
            None => PermissionState::Granted,
        }
    }

    pub fn has_permission(&self) -> bool {
        self.current_state().is_granted()
    }

    /// Whether the host exposes any recognised permission API
    pub fn is_supported(&self) -> bool {
        self.backends.state_backend(&self.host).is_some()
    }

    /// Name of the backend answering `current_state`, `None` when failing open
    pub fn active_backend(&self) -> Option<&'static str> {
        self.backends
            .state_backend(&self.host)
            .map(|backend| backend.name())
    }

    /// Ask the host for permission.
    ///
    /// Resolves with `Ok(())` when the negotiated state is granted and with
    /// [`NotGranted`] otherwise, including when the host request fails. The
    /// host request is issued before this method returns.
    pub fn request_async(
        &self,
    ) -> impl Future<Output = std::result::Result<(), NotGranted>> + Send + 'static {
        self.negotiate().map(|state| {
            if state.is_granted() {
                Ok(())
            } else {
                Err(NotGranted)
            }
        })
    }

    /// Ask the host for permission, reporting through callbacks.
    ///
    /// At most one of the callbacks runs, at most once. When the outcome is
    /// known immediately it runs before this method returns; otherwise it
    /// runs on the ambient Tokio runtime, or on a helper thread when none is
    /// entered. That helper thread lives until the host answers, so a host
    /// that never answers leaks one thread per call.
    #[deprecated(note = "use `request_async`")]
    pub fn request_legacy(
        &self,
        on_granted: Option<PermissionCallback>,
        on_denied: Option<PermissionCallback>,
    ) {
        let mut negotiation = self.negotiate();
        let deliver = move |state: PermissionState| {
            let callback = if state.is_granted() {
                on_granted
            } else {
                on_denied
            };
            if let Some(callback) = callback {
                callback();
            }
        };

        if let Some(state) = (&mut negotiation).now_or_never() {
            deliver(state);
            return;
        }

        drive(negotiation.map(deliver));
    }

    /// Resolve to `Granted` or `Denied`, issuing at most one host request.
    fn negotiate(&self) -> BoxFuture<'static, PermissionState> {
        let existing = self.current_state();
        if existing.is_decided() {
            tracing::debug!(state = %existing, "Permission already decided");
            return future::ready(existing).boxed();
        }

        let Some((backend, reply)) = self.backends.issue_request(&self.host) else {
            tracing::debug!("Host has no permission request function, failing open");
            return future::ready(PermissionState::Granted).boxed();
        };

        tracing::info!(backend, "Requested notification permission from host");

        async move {
            match reply.await {
                Ok(raw) => {
                    let state = sentinel::resolve(&raw);
                    tracing::info!(
                        backend,
                        reply = %raw,
                        state = %state,
                        "Host answered permission request"
                    );
                    state
                }
                Err(e) => {
                    tracing::warn!(backend, error = %e, "Host permission request failed");
                    PermissionState::Denied
                }
            }
        }
        .boxed()
    }
}

/// Run a pending legacy negotiation to completion in the background.
fn drive(task: impl Future<Output = ()> + Send + 'static) {
    if let Ok(handle) = tokio::runtime::Handle::try_current() {
        handle.spawn(task);
        return;
    }

    let spawned = std::thread::Builder::new()
        .name("herald-permission".to_string())
        .spawn(move || {
            match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime.block_on(task),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to start runtime for permission request")
                }
            }
        });

    if let Err(e) = spawned {
        tracing::error!(error = %e, "Failed to spawn permission request thread");
    }
}
