//! Shared configuration constants.
//!
//! All defaults live here rather than as magic numbers scattered through the
//! loader and type definitions.

/// Default HTTPS port for FortiGate management APIs.
pub const DEFAULT_FORTIGATE_PORT: u16 = 443;

/// Default per-device request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default virtual domain used when a device does not specify one.
pub const DEFAULT_VDOM: &str = "root";

/// Default TLS certificate verification setting.
///
/// FortiGate appliances commonly ship with self-signed certificates, so
/// verification is off by default and must be opted into per device.
pub const DEFAULT_VERIFY_TLS: bool = false;

/// Environment variable naming the JSON configuration file.
pub const CONFIG_PATH_ENV: &str = "FORTIGATE_RPC_CONFIG";

/// Service name used for keyring storage of device credentials.
pub const KEYRING_SERVICE: &str = "fortigate-rpc";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        assert_eq!(DEFAULT_FORTIGATE_PORT, 443);
        assert_eq!(DEFAULT_VDOM, "root");
        assert!(!DEFAULT_VERIFY_TLS);
        assert!(DEFAULT_TIMEOUT_SECS > 0);
    }
}
