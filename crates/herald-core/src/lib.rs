//! HERALD Core
//!
//! Entry point for applications: configuration, logging setup and the
//! public types of the permission and host crates.

mod config;
mod error;

pub use config::Config;
pub use error::CoreError;

pub use herald_host::{
    HostProfile, HostProfileError, LegacyProfile, ModernProfile, ProfileHost, RequestBehavior,
};
pub use herald_permission::{
    Backend, BackendTable, HostError, HostReply, HostSurface, LegacyCallback,
    LegacyNotificationApi, ModernNotificationApi, NotGranted, PermissionCallback,
    PermissionNegotiator, PermissionState, RawPermission, SiteModeFlag, LEGACY_CODE_TABLE,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging. `RUST_LOG` wins over the configured filter.
pub fn init_logging(config: &Config) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if fmt()
        .with_env_filter(filter)
        .with_target(config.log_target)
        .try_init()
        .is_err()
    {
        tracing::debug!("Logging already initialized");
    }
}
