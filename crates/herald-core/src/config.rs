//! Application configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use herald_host::{HostProfile, ProfileHost};
use herald_permission::PermissionNegotiator;

use crate::Result;

/// Path to a JSON config file
pub const CONFIG_ENV: &str = "HERALD_CONFIG";
/// Path to a JSON host profile, overriding the config file's
pub const HOST_PROFILE_ENV: &str = "HERALD_HOST_PROFILE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log filter used when `RUST_LOG` is not set
    pub log_filter: String,
    /// Include the event target in log lines
    pub log_target: bool,
    /// Host profile describing the notification APIs to expose. Without one
    /// the host has no permission concept and every check grants.
    pub host_profile: Option<PathBuf>,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&contents)?;

        tracing::debug!(path = %path.as_ref().display(), "Loaded config");

        Ok(config)
    }

    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match var(CONFIG_ENV) {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(path) = var(HOST_PROFILE_ENV) {
            config.host_profile = Some(PathBuf::from(path));
        }

        Ok(config)
    }

    pub fn host(&self) -> Result<ProfileHost> {
        let profile = match &self.host_profile {
            Some(path) => HostProfile::load(path)?,
            None => HostProfile::bare(),
        };

        Ok(ProfileHost::new(profile))
    }

    pub fn negotiator(&self) -> Result<PermissionNegotiator<ProfileHost>> {
        let negotiator = PermissionNegotiator::new(self.host()?);

        tracing::info!(
            backend = negotiator.active_backend().unwrap_or("none"),
            state = %negotiator.current_state(),
            "Notification permission negotiator ready"
        );

        Ok(negotiator)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            log_target: true,
            host_profile: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CoreError, NotGranted, PermissionState};
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.log_filter, "info");
        assert!(config.log_target);

        let negotiator = config.negotiator().unwrap();
        assert!(!negotiator.is_supported());
        assert_eq!(negotiator.current_state(), PermissionState::Granted);
    }

    #[test]
    fn test_load_config_with_profile() {
        let dir = TempDir::new().unwrap();
        let profile_path = dir.path().join("host.json");
        fs::write(&profile_path, r#"{ "legacy": { "code": 2 } }"#).unwrap();

        let config_path = dir.path().join("herald.json");
        fs::write(
            &config_path,
            serde_json::to_string(&Config {
                log_filter: "debug".to_string(),
                log_target: false,
                host_profile: Some(profile_path),
            })
            .unwrap(),
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.log_filter, "debug");

        let negotiator = config.negotiator().unwrap();
        assert_eq!(negotiator.current_state(), PermissionState::Denied);
        assert!(!negotiator.has_permission());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("herald.json");
        fs::write(&config_path, r#"{ "log_filter": "warn" }"#).unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.log_filter, "warn");
        assert!(config.log_target);
        assert_eq!(config.host_profile, None);
    }

    #[test]
    fn test_env_profile_override() {
        let dir = TempDir::new().unwrap();
        let profile_path = dir.path().join("host.json");
        fs::write(&profile_path, r#"{ "site_mode": false }"#).unwrap();

        let vars: HashMap<&str, String> = [(
            HOST_PROFILE_ENV,
            profile_path.to_string_lossy().to_string(),
        )]
        .into_iter()
        .collect();

        let config = Config::from_vars(|key| vars.get(key).cloned()).unwrap();
        assert_eq!(config.host_profile.as_deref(), Some(profile_path.as_path()));

        let negotiator = config.negotiator().unwrap();
        assert_eq!(negotiator.current_state(), PermissionState::Default);
    }

    #[test]
    fn test_missing_profile_is_error() {
        let config = Config {
            host_profile: Some(PathBuf::from("/nonexistent/host.json")),
            ..Config::default()
        };

        assert!(matches!(config.host(), Err(CoreError::HostProfile(_))));
    }

    #[tokio::test]
    async fn test_configured_request() {
        let dir = TempDir::new().unwrap();
        let profile_path = dir.path().join("host.json");
        fs::write(
            &profile_path,
            r#"{ "modern": { "permission": "default", "request": { "reply": "denied" } } }"#,
        )
        .unwrap();

        let config = Config {
            host_profile: Some(profile_path),
            ..Config::default()
        };
        let negotiator = config.negotiator().unwrap();

        assert_eq!(negotiator.request_async().await, Err(NotGranted));
        assert_eq!(negotiator.current_state(), PermissionState::Denied);
    }

    #[test]
    fn test_init_logging_twice() {
        let config = Config::default();
        crate::init_logging(&config);
        crate::init_logging(&config);
    }
}
