//! Device inventory types.
//!
//! Responsibilities:
//! - Define per-device connection settings (host, port, VDOM, TLS, timeout).
//! - Define credential material (API token XOR username/password).
//! - Preserve config-file ordering of the device inventory.
//!
//! Does NOT handle:
//! - Loading from files or environment (see `loader` module).
//! - Authentication flow or token exchange (see client crate).
//!
//! Invariants:
//! - `DeviceConfig` is immutable once loaded; the engine replaces it
//!   wholesale on add/remove, never partially.
//! - Duration fields serialize as integer seconds.
//! - When both a non-empty API token and a username/password pair are
//!   present in a config object, the token wins; an empty token string is
//!   treated as absent.

use crate::constants::{
    DEFAULT_FORTIGATE_PORT, DEFAULT_TIMEOUT_SECS, DEFAULT_VDOM, DEFAULT_VERIFY_TLS,
};
use crate::types::SecureValue;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// Module for serializing Duration as seconds (integer).
mod duration_seconds {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

/// Credential material for a single device.
///
/// The two forms are mutually exclusive; a non-empty `api_token` takes
/// precedence over a username/password pair when both appear in the same
/// config object.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CredentialConfig {
    /// Static API token (bearer authentication, preferred for automation).
    ApiToken { api_token: SecureValue },
    /// Username and password exchanged for a session cookie at first use.
    Password {
        username: String,
        password: SecureValue,
    },
}

impl CredentialConfig {
    /// Whether this is token-based authentication.
    pub fn is_api_token(&self) -> bool {
        matches!(self, Self::ApiToken { .. })
    }
}

impl<'de> Deserialize<'de> for CredentialConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(default)]
            api_token: Option<SecureValue>,
            #[serde(default)]
            username: Option<String>,
            #[serde(default)]
            password: Option<SecureValue>,
        }

        let raw = Raw::deserialize(deserializer)?;

        // Example configs ship api_token: "" next to username/password;
        // an empty token string must not shadow the password pair.
        if let Some(token) = raw.api_token {
            let present = match &token {
                SecureValue::Plain(s) => {
                    use secrecy::ExposeSecret;
                    !s.expose_secret().is_empty()
                }
                SecureValue::Keyring { .. } => true,
            };
            if present {
                return Ok(Self::ApiToken { api_token: token });
            }
        }

        match (raw.username, raw.password) {
            (Some(username), Some(password)) => Ok(Self::Password { username, password }),
            _ => Err(serde::de::Error::custom(
                "either 'api_token' or both 'username' and 'password' must be provided",
            )),
        }
    }
}

/// Connection settings for one FortiGate device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Device IP address or hostname.
    pub host: String,
    /// HTTPS management port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Credential material (token XOR username/password).
    #[serde(flatten)]
    pub credentials: CredentialConfig,
    /// Default virtual domain for commands against this device.
    #[serde(default = "default_vdom")]
    pub vdom: String,
    /// Whether to verify the device's TLS certificate.
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,
    /// Per-request timeout (serialized as seconds).
    #[serde(with = "duration_seconds", default = "default_timeout")]
    pub timeout: Duration,
}

fn default_port() -> u16 {
    DEFAULT_FORTIGATE_PORT
}

fn default_vdom() -> String {
    DEFAULT_VDOM.to_string()
}

fn default_verify_tls() -> bool {
    DEFAULT_VERIFY_TLS
}

fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
}

impl DeviceConfig {
    /// Create a config using API token authentication.
    pub fn with_api_token(host: impl Into<String>, token: SecureValue) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            credentials: CredentialConfig::ApiToken { api_token: token },
            vdom: default_vdom(),
            verify_tls: default_verify_tls(),
            timeout: default_timeout(),
        }
    }

    /// Create a config using username/password session authentication.
    pub fn with_password(
        host: impl Into<String>,
        username: impl Into<String>,
        password: SecureValue,
    ) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            credentials: CredentialConfig::Password {
                username: username.into(),
                password,
            },
            vdom: default_vdom(),
            verify_tls: default_verify_tls(),
            timeout: default_timeout(),
        }
    }

    /// Structural validation beyond what serde enforces.
    ///
    /// Returns a human-readable description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("host must not be empty".to_string());
        }
        if self.port == 0 {
            return Err("port must be non-zero".to_string());
        }
        if self.vdom.trim().is_empty() {
            return Err("vdom must not be empty".to_string());
        }
        if self.timeout.is_zero() {
            return Err("timeout must be non-zero".to_string());
        }
        if let CredentialConfig::Password { username, .. } = &self.credentials
            && username.trim().is_empty()
        {
            return Err("username must not be empty".to_string());
        }
        Ok(())
    }
}

/// Insertion-ordered device inventory keyed by device identifier.
///
/// JSON maps do not guarantee ordering once parsed into a hash map, so the
/// inventory is stored as a vector of entries and deserialized with a
/// custom visitor that rejects duplicate identifiers.
#[derive(Debug, Clone, Default)]
pub struct DevicesConfig {
    entries: Vec<(String, DeviceConfig)>,
}

impl DevicesConfig {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of configured devices.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the inventory is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a device by identifier.
    pub fn get(&self, id: &str) -> Option<&DeviceConfig> {
        self.entries
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, cfg)| cfg)
    }

    /// Insert a device, rejecting duplicate identifiers.
    pub fn insert(&mut self, id: String, config: DeviceConfig) -> Result<(), String> {
        if self.get(&id).is_some() {
            return Err(format!("duplicate device id '{}'", id));
        }
        self.entries.push((id, config));
        Ok(())
    }

    /// Iterate over `(id, config)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DeviceConfig)> {
        self.entries.iter().map(|(id, cfg)| (id.as_str(), cfg))
    }
}

impl Serialize for DevicesConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, cfg) in &self.entries {
            map.serialize_entry(id, cfg)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DevicesConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DevicesVisitor;

        impl<'de> Visitor<'de> for DevicesVisitor {
            type Value = DevicesConfig;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of device id to device configuration")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut devices = DevicesConfig::new();
                while let Some((id, cfg)) = access.next_entry::<String, DeviceConfig>()? {
                    devices
                        .insert(id, cfg)
                        .map_err(serde::de::Error::custom)?;
                }
                Ok(devices)
            }
        }

        deserializer.deserialize_map(DevicesVisitor)
    }
}
