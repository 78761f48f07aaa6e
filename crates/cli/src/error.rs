//! Exit codes for scripting and automation.
//!
//! Invariants:
//! - Exit codes 1-7 are reserved for specific failure categories.
//! - The mapping keys off the stable error kind carried in the result
//!   envelope, so scripts can rely on it across releases.

use fortigate_client::ResultEnvelope;

/// Structured exit codes for fortigate-cli.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Command completed successfully.
    Success = 0,
    /// Generic failure (config errors, malformed local input).
    GeneralError = 1,
    /// Authentication failure; refresh credentials before retrying.
    AuthenticationFailed = 2,
    /// Network failure; safe to retry with backoff.
    ConnectionError = 3,
    /// Unknown device or resource.
    NotFound = 4,
    /// Invalid parameters or unknown command; fix the input, do not retry.
    ValidationError = 5,
    /// The device reported an application-level error.
    RemoteError = 6,
    /// The device response could not be normalized.
    MalformedResponse = 7,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Derive the exit code from a dispatch result envelope.
    pub fn from_envelope(envelope: &ResultEnvelope) -> Self {
        let Some(error) = &envelope.error else {
            return Self::Success;
        };
        match error.kind.as_str() {
            "auth_error" => Self::AuthenticationFailed,
            "connectivity_error" => Self::ConnectionError,
            "device_not_found" => Self::NotFound,
            "unknown_command" | "invalid_parameter" | "duplicate_device" | "invalid_url" => {
                Self::ValidationError
            }
            "remote_api_error" => Self::RemoteError,
            "normalization_error" => Self::MalformedResponse,
            _ => Self::GeneralError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fortigate_client::envelope::{Payload, ResultEnvelope};
    use fortigate_client::{EngineError, OperationStatus};

    #[test]
    fn test_success_envelope_maps_to_zero() {
        let envelope = ResultEnvelope::ok(Payload::Status(OperationStatus::Ok));
        assert_eq!(ExitCode::from_envelope(&envelope), ExitCode::Success);
    }

    #[test]
    fn test_error_kind_mapping() {
        let cases = [
            (
                EngineError::DeviceNotFound("fw1".into()),
                ExitCode::NotFound,
            ),
            (
                EngineError::UnknownCommand("x".into()),
                ExitCode::ValidationError,
            ),
            (
                EngineError::invalid_parameter("gateway", "missing"),
                ExitCode::ValidationError,
            ),
            (
                EngineError::RemoteApi {
                    status: 500,
                    message: "boom".into(),
                },
                ExitCode::RemoteError,
            ),
            (
                EngineError::Normalization("bad shape".into()),
                ExitCode::MalformedResponse,
            ),
        ];
        for (error, expected) in cases {
            let envelope = ResultEnvelope::failure(&error);
            assert_eq!(ExitCode::from_envelope(&envelope), expected, "{:?}", error);
        }
    }
}
