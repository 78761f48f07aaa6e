//! Address and service object records.

use super::common::text;
use serde::Serialize;
use serde_json::Value;

/// A firewall address object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_type: Option<String>,
    /// The address value: subnet, range, or FQDN depending on the type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl AddressRecord {
    pub fn from_vendor(value: &Value) -> Option<Self> {
        let name = text(value.get("name"))?;
        let address_type = text(value.get("type"));
        let address = match address_type.as_deref() {
            Some("iprange") => {
                match (text(value.get("start-ip")), text(value.get("end-ip"))) {
                    (Some(start), Some(end)) => Some(format!("{}-{}", start, end)),
                    (start, _) => start,
                }
            }
            Some("fqdn") => text(value.get("fqdn")),
            _ => text(value.get("subnet")),
        };
        Some(Self {
            name,
            address_type,
            address,
            comment: text(value.get("comment")),
        })
    }
}

/// A custom service object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ServiceRecord {
    pub fn from_vendor(value: &Value) -> Option<Self> {
        let name = text(value.get("name"))?;
        // Port ranges live under protocol-specific keys.
        let port = text(value.get("tcp-portrange"))
            .or_else(|| text(value.get("udp-portrange")))
            .or_else(|| text(value.get("port")));
        Some(Self {
            name,
            protocol: text(value.get("protocol")),
            port,
            comment: text(value.get("comment")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ipmask_address() {
        let record = AddressRecord::from_vendor(&json!({
            "name": "internal-net",
            "type": "ipmask",
            "subnet": "10.0.0.0 255.255.255.0"
        }))
        .unwrap();
        assert_eq!(record.address.as_deref(), Some("10.0.0.0 255.255.255.0"));
    }

    #[test]
    fn test_iprange_address() {
        let record = AddressRecord::from_vendor(&json!({
            "name": "dhcp-pool",
            "type": "iprange",
            "start-ip": "10.0.0.10",
            "end-ip": "10.0.0.50"
        }))
        .unwrap();
        assert_eq!(record.address.as_deref(), Some("10.0.0.10-10.0.0.50"));
    }

    #[test]
    fn test_fqdn_address() {
        let record = AddressRecord::from_vendor(&json!({
            "name": "updates",
            "type": "fqdn",
            "fqdn": "updates.example.com"
        }))
        .unwrap();
        assert_eq!(record.address.as_deref(), Some("updates.example.com"));
    }

    #[test]
    fn test_nameless_address_is_skipped() {
        assert!(AddressRecord::from_vendor(&json!({"type": "ipmask"})).is_none());
    }

    #[test]
    fn test_tcp_service() {
        let record = ServiceRecord::from_vendor(&json!({
            "name": "web",
            "protocol": "TCP/UDP/SCTP",
            "tcp-portrange": "80,443"
        }))
        .unwrap();
        assert_eq!(record.port.as_deref(), Some("80,443"));
    }

    #[test]
    fn test_udp_service_port_fallback() {
        let record = ServiceRecord::from_vendor(&json!({
            "name": "dns",
            "udp-portrange": "53"
        }))
        .unwrap();
        assert_eq!(record.port.as_deref(), Some("53"));
    }
}
