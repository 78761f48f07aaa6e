//! Device inventory loading.
//!
//! Responsibilities:
//! - Locate the JSON configuration file (explicit path or
//!   `FORTIGATE_RPC_CONFIG`).
//! - Validate the structure before typed deserialization so that errors
//!   name the offending device and field.
//! - Produce an insertion-ordered [`DevicesConfig`].
//!
//! Does NOT handle:
//! - Persisting configuration back to disk.
//! - Anything network-related; loading is pure file/env work.
//!
//! Invariants:
//! - Every device entry has a non-empty `host` and either an `api_token`
//!   or both `username` and `password`.
//! - At least one device must be configured.

mod error;

pub use error::ConfigError;

use crate::constants::CONFIG_PATH_ENV;
use crate::types::DevicesConfig;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Builder-style loader for the device inventory.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    path: Option<PathBuf>,
    load_dotenv: bool,
}

impl ConfigLoader {
    /// Create a loader with no explicit path (environment fallback applies).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an explicit configuration file path.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Load `.env` before consulting environment variables.
    pub fn with_dotenv(mut self) -> Self {
        self.load_dotenv = true;
        self
    }

    /// Load `.env` immediately, for callers that read environment
    /// variables before building a loader (e.g. CLI argument parsing).
    /// A missing `.env` file is not an error.
    pub fn load_dotenv(&self) -> Result<(), ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(()),
            Err(e) if e.not_found() => Ok(()),
            Err(e) => Err(ConfigError::Invalid(format!(".env load failed: {}", e))),
        }
    }

    /// Load and validate the device inventory.
    pub fn load(self) -> Result<DevicesConfig, ConfigError> {
        if self.load_dotenv {
            // Missing .env files are fine; only explicit config is required.
            dotenvy::dotenv().ok();
        }

        let path = match self.path {
            Some(p) => p,
            None => std::env::var(CONFIG_PATH_ENV)
                .map(PathBuf::from)
                .ok()
                .or_else(default_config_path)
                .ok_or_else(|| ConfigError::MissingPath(CONFIG_PATH_ENV.to_string()))?,
        };

        debug!(path = %path.display(), "loading device inventory");
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let raw: Value = serde_json::from_str(&content)?;

        Self::load_from_value(&raw)
    }

    /// Parse an already-loaded JSON document into the device inventory.
    ///
    /// Accepts either the full server layout (`{"fortigate": {"devices":
    /// {...}}}`) or a bare `{"devices": {...}}` document.
    pub fn load_from_value(raw: &Value) -> Result<DevicesConfig, ConfigError> {
        let root = raw
            .as_object()
            .ok_or_else(|| ConfigError::Invalid("configuration must be a JSON object".into()))?;

        let devices = root
            .get("fortigate")
            .and_then(|f| f.get("devices"))
            .or_else(|| root.get("devices"))
            .ok_or_else(|| {
                ConfigError::Invalid("configuration must contain a 'devices' section".into())
            })?;

        validate_devices_value(devices)?;

        let devices: DevicesConfig = serde_json::from_value(devices.clone())?;
        for (id, cfg) in devices.iter() {
            cfg.validate()
                .map_err(|msg| ConfigError::Invalid(format!("device '{}': {}", id, msg)))?;
        }
        Ok(devices)
    }

    /// Convenience: load from a file path without builder chaining.
    pub fn load_file(path: impl AsRef<Path>) -> Result<DevicesConfig, ConfigError> {
        Self::new().with_path(path.as_ref()).load()
    }
}

/// Platform config-directory fallback, used only when the file exists
/// there (`~/.config/fortigate-rpc/devices.json` on Linux).
fn default_config_path() -> Option<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "fortigate-rpc")?;
    let path = dirs.config_dir().join("devices.json");
    path.exists().then_some(path)
}

/// Structural validation of the raw devices map.
///
/// Runs before typed deserialization so that a device missing its
/// credentials produces a named error instead of an opaque untagged-enum
/// mismatch from serde.
fn validate_devices_value(devices: &Value) -> Result<(), ConfigError> {
    let map = devices.as_object().ok_or_else(|| {
        ConfigError::Invalid("'devices' must be an object keyed by device id".into())
    })?;

    if map.is_empty() {
        return Err(ConfigError::Invalid(
            "at least one device must be configured".into(),
        ));
    }

    for (id, device) in map {
        let obj = device.as_object().ok_or_else(|| {
            ConfigError::Invalid(format!("device '{}' configuration must be an object", id))
        })?;

        let host_present = obj
            .get("host")
            .and_then(Value::as_str)
            .is_some_and(|h| !h.trim().is_empty());
        if !host_present {
            return Err(ConfigError::Invalid(format!(
                "device '{}' must have a 'host' field",
                id
            )));
        }

        let has_token = field_present(obj.get("api_token"));
        let has_credentials =
            field_present(obj.get("username")) && field_present(obj.get("password"));
        if !(has_token || has_credentials) {
            return Err(ConfigError::Invalid(format!(
                "device '{}' must have either 'api_token' or both 'username' and 'password'",
                id
            )));
        }
    }
    Ok(())
}

/// A credential field counts as present when it is a non-empty string or a
/// keyring reference object.
fn field_present(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Object(o)) => o.contains_key("keyring_account"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_load_from_full_layout() {
        let raw = json!({
            "server": {"host": "0.0.0.0", "port": 8814},
            "fortigate": {
                "devices": {
                    "default": {"host": "192.168.1.1", "api_token": "T"}
                }
            }
        });
        let devices = ConfigLoader::load_from_value(&raw).unwrap();
        assert_eq!(devices.len(), 1);
        assert!(devices.get("default").is_some());
    }

    #[test]
    fn test_load_from_bare_devices_layout() {
        let raw = json!({
            "devices": {
                "fw1": {"host": "10.0.0.1", "username": "admin", "password": "pw"}
            }
        });
        let devices = ConfigLoader::load_from_value(&raw).unwrap();
        assert_eq!(devices.len(), 1);
    }

    #[test]
    fn test_missing_devices_section() {
        let raw = json!({"server": {}});
        let err = ConfigLoader::load_from_value(&raw).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("devices"));
    }

    #[test]
    fn test_empty_devices_rejected() {
        let raw = json!({"devices": {}});
        let err = ConfigLoader::load_from_value(&raw).unwrap_err();
        assert!(err.to_string().contains("at least one device"));
    }

    #[test]
    fn test_device_without_host_rejected() {
        let raw = json!({"devices": {"fw1": {"api_token": "T"}}});
        let err = ConfigLoader::load_from_value(&raw).unwrap_err();
        assert!(err.to_string().contains("'fw1'"));
        assert!(err.to_string().contains("host"));
    }

    #[test]
    fn test_device_without_credentials_rejected() {
        let raw = json!({"devices": {"fw1": {"host": "10.0.0.1"}}});
        let err = ConfigLoader::load_from_value(&raw).unwrap_err();
        assert!(err.to_string().contains("api_token"));
    }

    #[test]
    fn test_device_with_username_but_no_password_rejected() {
        let raw = json!({"devices": {"fw1": {"host": "10.0.0.1", "username": "admin"}}});
        let err = ConfigLoader::load_from_value(&raw).unwrap_err();
        assert!(err.to_string().contains("'fw1'"));
    }

    #[test]
    fn test_empty_token_counts_as_absent() {
        // The original server config ships example files with api_token: ""
        // alongside username/password; the empty token must not shadow them.
        let raw = json!({"devices": {"fw1": {
            "host": "10.0.0.1",
            "api_token": "",
            "username": "admin",
            "password": "pw"
        }}});
        let devices = ConfigLoader::load_from_value(&raw).unwrap();
        assert!(devices.get("fw1").is_some());
    }

    #[test]
    fn test_keyring_reference_counts_as_present() {
        let raw = json!({"devices": {"fw1": {
            "host": "10.0.0.1",
            "username": "admin",
            "password": {"keyring_account": "fw1-admin"}
        }}});
        let devices = ConfigLoader::load_from_value(&raw).unwrap();
        assert!(devices.get("fw1").is_some());
    }
}
