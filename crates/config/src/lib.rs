//! Device inventory configuration for the FortiGate dispatch engine.
//!
//! Responsibilities:
//! - Typed device configuration (host, credentials, VDOM, TLS, timeout).
//! - Loading and validating the JSON inventory file, with environment
//!   fallback for the path.
//! - Secret handling: plain values wrapped in `secrecy::SecretString`,
//!   keyring references resolved on demand.
//!
//! Does NOT handle:
//! - Network connections or authentication flows (see `fortigate-client`).

pub mod constants;
mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader};
pub use types::{CredentialConfig, DeviceConfig, DevicesConfig, SecureValue};
