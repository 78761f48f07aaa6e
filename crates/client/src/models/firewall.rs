//! Firewall policy records.

use super::common::{id_number, member_names, text};
use serde::Serialize;
use serde_json::Value;

/// A firewall policy in the engine's stable vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyRecord {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub source: Vec<String>,
    pub destination: Vec<String>,
    pub services: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl PolicyRecord {
    /// Parse a vendor policy object. Returns `None` when the object has
    /// no usable policy identifier.
    pub fn from_vendor(value: &Value) -> Option<Self> {
        let id = id_number(value.get("policyid"))?;
        Some(Self {
            id,
            name: text(value.get("name")),
            action: text(value.get("action")),
            source: member_names(value.get("srcaddr")),
            destination: member_names(value.get("dstaddr")),
            services: member_names(value.get("service")),
            status: text(value.get("status")),
        })
    }
}
