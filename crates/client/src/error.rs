//! Error types for the dispatch engine.

use std::fmt;
use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Sub-kind for authentication failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// The device rejected the supplied credentials or token.
    CredentialsInvalid,
    /// The device could not be reached to authenticate.
    Unreachable,
    /// TLS negotiation with the device failed.
    TlsFailure,
}

impl fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CredentialsInvalid => write!(f, "credentials_invalid"),
            Self::Unreachable => write!(f, "unreachable"),
            Self::TlsFailure => write!(f, "tls_failure"),
        }
    }
}

/// Sub-kind for network-level failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityKind {
    /// The device did not respond within the configured timeout.
    Timeout,
    /// The connection was refused or reset before a response arrived.
    ConnectionRefused,
}

impl fmt::Display for ConnectivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::ConnectionRefused => write!(f, "connection_refused"),
        }
    }
}

/// Errors that can occur during command dispatch.
///
/// Every dispatch call terminates in either a success envelope or exactly
/// one of these kinds; nothing is swallowed and nothing escapes as an
/// unstructured failure.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The command named a device that is not registered.
    #[error("device '{0}' not found")]
    DeviceNotFound(String),

    /// `add_device` named an identifier that already exists.
    #[error("device '{0}' already exists")]
    DuplicateDevice(String),

    /// The command name is not in the closed command set.
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    /// A parameter failed declarative validation before any network call.
    #[error("invalid parameter '{key}': {reason}")]
    InvalidParameter { key: String, reason: String },

    /// Authentication against the device failed.
    #[error("authentication failed ({kind}): {message}")]
    Auth {
        kind: AuthErrorKind,
        message: String,
        /// HTTP status from the device when the rejection came over the
        /// wire (terminal 401/403); `None` for local failures such as
        /// keyring resolution.
        status: Option<u16>,
    },

    /// Network-level failure after the bounded retry was exhausted.
    #[error("connectivity failure ({kind}): {message}")]
    Connectivity {
        kind: ConnectivityKind,
        message: String,
    },

    /// The vendor response did not match the expected shape.
    #[error("response normalization failed: {0}")]
    Normalization(String),

    /// Well-formed vendor-reported failure (duplicate name, object in use).
    #[error("remote API error ({status}): {message}")]
    RemoteApi { status: u16, message: String },

    /// A device host/port could not be assembled into a valid base URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl EngineError {
    /// Stable kind identifier used in the error envelope.
    pub fn kind_str(&self) -> &'static str {
        match self {
            Self::DeviceNotFound(_) => "device_not_found",
            Self::DuplicateDevice(_) => "duplicate_device",
            Self::UnknownCommand(_) => "unknown_command",
            Self::InvalidParameter { .. } => "invalid_parameter",
            Self::Auth { .. } => "auth_error",
            Self::Connectivity { .. } => "connectivity_error",
            Self::Normalization(_) => "normalization_error",
            Self::RemoteApi { .. } => "remote_api_error",
            Self::InvalidUrl(_) => "invalid_url",
        }
    }

    /// Whether the dispatcher may retry the network call once.
    ///
    /// Only network-level failures qualify; validation and
    /// application-level (4xx) errors are never retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connectivity { .. })
    }

    /// Whether this error indicates an authentication failure.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Auth { .. })
            || matches!(self, Self::RemoteApi { status, .. } if *status == 401 || *status == 403)
    }

    /// Remote status code, when the error carries one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::RemoteApi { status, .. } => Some(*status),
            Self::Auth { status, .. } => *status,
            _ => None,
        }
    }

    /// Terminal authentication rejection observed on the wire.
    pub(crate) fn auth_rejected(message: impl Into<String>, status: u16) -> Self {
        Self::Auth {
            kind: AuthErrorKind::CredentialsInvalid,
            message: message.into(),
            status: Some(status),
        }
    }

    /// Convenience constructor for parameter validation failures.
    pub fn invalid_parameter(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
