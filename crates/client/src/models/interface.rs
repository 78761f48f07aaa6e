//! Network interface records.

use super::common::text;
use serde::Serialize;
use serde_json::Value;

/// A network interface, from either the cmdb inventory or the monitor
/// status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterfaceRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vdom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl InterfaceRecord {
    pub fn from_vendor(value: &Value) -> Option<Self> {
        let name = text(value.get("name"))?;
        // The monitor endpoint reports link state under "link"; cmdb uses
        // the admin "status" field.
        let status = text(value.get("status")).or_else(|| {
            value.get("link").and_then(Value::as_bool).map(|up| {
                if up { "up".to_string() } else { "down".to_string() }
            })
        });
        Some(Self {
            name,
            ip: text(value.get("ip")),
            status,
            vdom: text(value.get("vdom")),
            kind: text(value.get("type")),
            alias: text(value.get("alias")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cmdb_interface_parses() {
        let record = InterfaceRecord::from_vendor(&json!({
            "name": "port1",
            "ip": "192.168.1.99 255.255.255.0",
            "status": "up",
            "vdom": "root",
            "type": "physical",
            "alias": "wan"
        }))
        .unwrap();
        assert_eq!(record.name, "port1");
        assert_eq!(record.kind.as_deref(), Some("physical"));
    }

    #[test]
    fn test_monitor_link_state_maps_to_status() {
        let record = InterfaceRecord::from_vendor(&json!({
            "name": "port2",
            "link": true
        }))
        .unwrap();
        assert_eq!(record.status.as_deref(), Some("up"));

        let record = InterfaceRecord::from_vendor(&json!({
            "name": "port3",
            "link": false
        }))
        .unwrap();
        assert_eq!(record.status.as_deref(), Some("down"));
    }
}
