//! Static route and routing table records.

use super::common::{id_number, text};
use serde::Serialize;
use serde_json::Value;

/// A configured static route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRecord {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl RouteRecord {
    pub fn from_vendor(value: &Value) -> Option<Self> {
        let id = id_number(value.get("seq-num"))?;
        Some(Self {
            id,
            destination: text(value.get("dst")),
            gateway: text(value.get("gateway")),
            interface: text(value.get("device")),
            distance: id_number(value.get("distance")),
            status: text(value.get("status")),
        })
    }
}

/// A live routing table entry from the monitor endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteTableEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<i64>,
}

impl RouteTableEntry {
    pub fn from_vendor(value: &Value) -> Self {
        Self {
            route_type: text(value.get("type")),
            destination: text(value.get("ip_mask")).or_else(|| text(value.get("dst"))),
            gateway: text(value.get("gateway")),
            interface: text(value.get("interface")),
            distance: id_number(value.get("distance")),
            metric: id_number(value.get("metric")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_static_route_parses() {
        let record = RouteRecord::from_vendor(&json!({
            "seq-num": 3,
            "dst": "10.20.0.0 255.255.0.0",
            "gateway": "192.168.1.254",
            "device": "port1",
            "distance": 10,
            "status": "enable"
        }))
        .unwrap();
        assert_eq!(record.id, 3);
        assert_eq!(record.interface.as_deref(), Some("port1"));
        assert_eq!(record.distance, Some(10));
    }

    #[test]
    fn test_route_without_sequence_is_skipped() {
        assert!(RouteRecord::from_vendor(&json!({"dst": "0.0.0.0/0"})).is_none());
    }

    #[test]
    fn test_routing_table_entry_parses() {
        let entry = RouteTableEntry::from_vendor(&json!({
            "type": "connect",
            "ip_mask": "10.0.0.0/24",
            "interface": "port2",
            "distance": 0,
            "metric": 0
        }));
        assert_eq!(entry.route_type.as_deref(), Some("connect"));
        assert_eq!(entry.destination.as_deref(), Some("10.0.0.0/24"));
        assert!(entry.gateway.is_none());
    }
}
