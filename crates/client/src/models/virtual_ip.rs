//! Virtual IP (DNAT) records.

use super::common::{member_names, text};
use serde::Serialize;
use serde_json::Value;

/// A virtual IP mapping in the engine's vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VirtualIpRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapped_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_interface: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_forward: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_port: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapped_port: Option<String>,
}

impl VirtualIpRecord {
    pub fn from_vendor(value: &Value) -> Option<Self> {
        let name = text(value.get("name"))?;
        // mappedip arrives as [{"range": ...}] on newer firmware, as a
        // plain string on older.
        let mapped_ip = match value.get("mappedip") {
            Some(Value::Array(items)) => items
                .first()
                .and_then(|item| item.get("range"))
                .and_then(Value::as_str)
                .map(String::from)
                .or_else(|| member_names(value.get("mappedip")).into_iter().next()),
            other => text(other),
        };
        Some(Self {
            name,
            external_ip: text(value.get("extip")),
            mapped_ip,
            external_interface: text(value.get("extintf")),
            port_forward: text(value.get("portforward")),
            protocol: text(value.get("protocol")),
            external_port: text(value.get("extport")),
            mapped_port: text(value.get("mappedport")),
        })
    }
}
