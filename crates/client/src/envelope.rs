//! The uniform result envelope returned by every dispatch call.
//!
//! This is the only type that crosses the dispatch boundary. It serializes
//! directly into the outer transport's JSON payload; the engine defines no
//! wire format beyond this structure.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Closed status vocabulary for action (create/update/delete) results.
///
/// Vendor status strings and HTTP codes are coerced into this set by the
/// normalizer; callers never see raw vendor statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    Ok,
    NotFound,
    Conflict,
    Invalid,
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::Invalid => write!(f, "invalid"),
        }
    }
}

/// Normalized payload shapes.
///
/// List endpoints yield `Records`, detail endpoints a single `Record`,
/// action endpoints a scalar `Status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Records(Vec<Value>),
    // Status precedes Record so untagged deserialization prefers the
    // closed status vocabulary over a bare JSON string.
    Status(OperationStatus),
    Record(Value),
}

/// Structured error detail carried by failure envelopes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Stable error kind identifier (see [`EngineError::kind_str`]).
    pub kind: String,
    /// Human-readable message.
    pub message: String,
    /// Remote HTTP status code, when the failure carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

/// Uniform success/error structure returned by every dispatch call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Payload>,
    /// Opaque pagination cursor passed through from the vendor, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

impl ResultEnvelope {
    /// Success envelope with the given payload.
    pub fn ok(data: Payload) -> Self {
        Self {
            success: true,
            data: Some(data),
            cursor: None,
            error: None,
        }
    }

    /// Success envelope with a pagination cursor attached.
    pub fn ok_with_cursor(data: Payload, cursor: Option<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            cursor,
            error: None,
        }
    }

    /// Failure envelope from an engine error.
    pub fn failure(err: &EngineError) -> Self {
        Self {
            success: false,
            data: None,
            cursor: None,
            error: Some(ErrorDetail {
                kind: err.kind_str().to_string(),
                message: err.to_string(),
                status_code: err.status_code(),
            }),
        }
    }
}

impl From<EngineError> for ResultEnvelope {
    fn from(err: EngineError) -> Self {
        Self::failure(&err)
    }
}
