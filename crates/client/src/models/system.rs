//! System status and VDOM records.

use super::common::text;
use serde::Serialize;
use serde_json::Value;

/// Device system status.
///
/// The status endpoint spreads identity fields between the envelope and
/// the results object depending on firmware; parsing accepts both.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemStatusRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl SystemStatusRecord {
    /// Parse from the full response body plus its extracted results.
    pub fn from_vendor(envelope: &Value, results: &Value) -> Self {
        let pick = |key: &str| text(results.get(key)).or_else(|| text(envelope.get(key)));
        Self {
            hostname: pick("hostname"),
            version: pick("version"),
            serial: pick("serial"),
            model: pick("model_name").or_else(|| pick("model")),
            status: pick("status"),
        }
    }
}

/// A virtual domain name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VdomRecord {
    pub name: String,
}

impl VdomRecord {
    pub fn from_vendor(value: &Value) -> Option<Self> {
        text(value.get("name")).map(|name| Self { name })
    }
}
