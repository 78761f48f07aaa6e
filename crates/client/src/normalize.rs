//! Response normalization.
//!
//! Takes a raw [`ApiResponse`] plus the endpoint's [`ResourceKind`] and
//! produces the engine's stable payload shapes. All vendor field-name
//! knowledge on the read path lives in `models`; all status-code
//! interpretation for action endpoints lives here.

use crate::endpoints::ResourceKind;
use crate::envelope::{OperationStatus, Payload};
use crate::error::{EngineError, Result};
use crate::models::{
    AddressRecord, InterfaceRecord, PolicyRecord, RouteRecord, RouteTableEntry, ServiceRecord,
    SystemStatusRecord, VdomRecord, VirtualIpRecord,
};
use crate::transport::ApiResponse;
use serde_json::Value;
use tracing::warn;

/// The outcome of normalizing one response.
#[derive(Debug)]
pub struct Normalized {
    pub payload: Payload,
    /// Opaque pagination cursor passed through untouched.
    pub cursor: Option<String>,
    /// VDOM names extracted by the discovery endpoint, for the session to
    /// record.
    pub vdoms: Option<Vec<String>>,
}

impl Normalized {
    fn payload(payload: Payload) -> Self {
        Self {
            payload,
            cursor: None,
            vdoms: None,
        }
    }
}

/// Normalize a response according to the endpoint's resource kind.
pub fn normalize(kind: ResourceKind, response: &ApiResponse) -> Result<Normalized> {
    if kind == ResourceKind::ActionStatus {
        return action_status(response).map(|status| Normalized::payload(Payload::Status(status)));
    }

    if !response.is_success() {
        return Err(EngineError::RemoteApi {
            status: response.status,
            message: response.error_message(),
        });
    }

    match kind {
        ResourceKind::PolicyList => record_list(response, PolicyRecord::from_vendor),
        ResourceKind::AddressList => record_list(response, AddressRecord::from_vendor),
        ResourceKind::ServiceList => record_list(response, ServiceRecord::from_vendor),
        ResourceKind::VipList => record_list(response, VirtualIpRecord::from_vendor),
        ResourceKind::VipDetail => record_detail(response, VirtualIpRecord::from_vendor),
        ResourceKind::RouteList => record_list(response, RouteRecord::from_vendor),
        ResourceKind::RouteDetail => record_detail(response, RouteRecord::from_vendor),
        ResourceKind::RoutingTable => {
            record_list(response, |v| Some(RouteTableEntry::from_vendor(v)))
        }
        ResourceKind::InterfaceList => record_list(response, InterfaceRecord::from_vendor),
        ResourceKind::InterfaceStatus => record_detail(response, InterfaceRecord::from_vendor),
        ResourceKind::SystemStatus => {
            let results = results_value(response)?;
            let record = SystemStatusRecord::from_vendor(&response.body, &results);
            to_record(&record).map(Normalized::payload)
        }
        ResourceKind::ConnectionTest => {
            let results = results_value(response)?;
            let status = SystemStatusRecord::from_vendor(&response.body, &results);
            let mut record = to_value(&status)?;
            if let Value::Object(obj) = &mut record {
                obj.insert("connected".to_string(), Value::Bool(true));
            }
            Ok(Normalized::payload(Payload::Record(record)))
        }
        ResourceKind::VdomList => {
            let items = results_array(response)?;
            let records: Vec<VdomRecord> = items.iter().filter_map(VdomRecord::from_vendor).collect();
            let names: Vec<String> = records.iter().map(|r| r.name.clone()).collect();
            let values = records
                .iter()
                .map(to_value)
                .collect::<Result<Vec<Value>>>()?;
            Ok(Normalized {
                payload: Payload::Records(values),
                cursor: None,
                vdoms: Some(names),
            })
        }
        ResourceKind::ActionStatus => unreachable!("handled above"),
    }
}

/// Coerce an action (create/update/delete) response to a scalar status.
///
/// Vendor failure modes that represent a well-defined outcome become
/// statuses rather than errors; everything else is a remote API error.
fn action_status(response: &ApiResponse) -> Result<OperationStatus> {
    match response.status {
        status if (200..300).contains(&status) => Ok(OperationStatus::Ok),
        404 => Ok(OperationStatus::NotFound),
        409 | 424 => Ok(OperationStatus::Conflict),
        400 => Ok(OperationStatus::Invalid),
        // The CLI backend reports "entry in use" style failures as 500
        // with a negative error code.
        500 if response.body.get("error").and_then(Value::as_i64) == Some(-5) => {
            Ok(OperationStatus::Conflict)
        }
        status => Err(EngineError::RemoteApi {
            status,
            message: response.error_message(),
        }),
    }
}

fn record_list<T, F>(response: &ApiResponse, parse: F) -> Result<Normalized>
where
    T: serde::Serialize,
    F: Fn(&Value) -> Option<T>,
{
    let items = results_array(response)?;
    let mut records = Vec::with_capacity(items.len());
    for item in &items {
        match parse(item) {
            Some(record) => records.push(to_value(&record)?),
            None => warn!("skipping malformed record in device response"),
        }
    }
    Ok(Normalized {
        payload: Payload::Records(records),
        cursor: cursor_from(&response.body),
        vdoms: None,
    })
}

fn record_detail<T, F>(response: &ApiResponse, parse: F) -> Result<Normalized>
where
    T: serde::Serialize,
    F: Fn(&Value) -> Option<T>,
{
    let results = results_value(response)?;
    // Detail reads on table endpoints return a single-element array.
    let item = match &results {
        Value::Array(items) => items.first().cloned().ok_or_else(|| {
            EngineError::Normalization("detail response contained no entry".to_string())
        })?,
        other => other.clone(),
    };
    let record = parse(&item).ok_or_else(|| {
        EngineError::Normalization("detail entry is missing required fields".to_string())
    })?;
    to_record(&record).map(Normalized::payload)
}

/// The `results` member of a response body, in whatever shape it arrived.
fn results_value(response: &ApiResponse) -> Result<Value> {
    response.body.get("results").cloned().ok_or_else(|| {
        EngineError::Normalization("response body has no 'results' member".to_string())
    })
}

fn results_array(response: &ApiResponse) -> Result<Vec<Value>> {
    match results_value(response)? {
        Value::Array(items) => Ok(items),
        other => Err(EngineError::Normalization(format!(
            "expected 'results' to be an array, got {}",
            value_kind(&other)
        ))),
    }
}

fn cursor_from(body: &Value) -> Option<String> {
    body.get("cursor")
        .or_else(|| body.get("next"))
        .and_then(Value::as_str)
        .map(String::from)
}

fn to_value<T: serde::Serialize>(record: &T) -> Result<Value> {
    serde_json::to_value(record)
        .map_err(|e| EngineError::Normalization(format!("record serialization failed: {}", e)))
}

fn to_record<T: serde::Serialize>(record: &T) -> Result<Payload> {
    to_value(record).map(Payload::Record)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: u16, body: Value) -> ApiResponse {
        ApiResponse { status, body }
    }

    #[test]
    fn test_policy_list_normalizes_records() {
        let resp = response(
            200,
            json!({"results": [{"policyid": 1, "action": "accept"}], "http_status": 200}),
        );
        let normalized = normalize(ResourceKind::PolicyList, &resp).unwrap();
        match normalized.payload {
            Payload::Records(records) => {
                assert_eq!(records.len(), 1);
                assert_eq!(records[0]["id"], json!(1));
                assert_eq!(records[0]["action"], json!("accept"));
            }
            other => panic!("expected records, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_list_entry_is_skipped() {
        let resp = response(
            200,
            json!({"results": [{"policyid": 1}, {"no_id": true}]}),
        );
        let normalized = normalize(ResourceKind::PolicyList, &resp).unwrap();
        match normalized.payload {
            Payload::Records(records) => assert_eq!(records.len(), 1),
            other => panic!("expected records, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_results_is_normalization_error() {
        let resp = response(200, json!({"http_status": 200}));
        let err = normalize(ResourceKind::AddressList, &resp).unwrap_err();
        assert!(matches!(err, EngineError::Normalization(_)));
    }

    #[test]
    fn test_non_array_results_for_list_is_normalization_error() {
        let resp = response(200, json!({"results": {"name": "one"}}));
        let err = normalize(ResourceKind::AddressList, &resp).unwrap_err();
        assert!(matches!(err, EngineError::Normalization(_)));
    }

    #[test]
    fn test_read_error_status_maps_to_remote_api() {
        let resp = response(500, json!({"error": -3}));
        let err = normalize(ResourceKind::PolicyList, &resp).unwrap_err();
        match err {
            EngineError::RemoteApi { status, .. } => assert_eq!(status, 500),
            other => panic!("expected RemoteApi, got {:?}", other),
        }
    }

    #[test]
    fn test_action_status_coercion() {
        let ok = normalize(ResourceKind::ActionStatus, &response(200, json!({"status": "success"})));
        assert!(matches!(ok.unwrap().payload, Payload::Status(OperationStatus::Ok)));

        let missing = normalize(ResourceKind::ActionStatus, &response(404, json!({})));
        assert!(matches!(
            missing.unwrap().payload,
            Payload::Status(OperationStatus::NotFound)
        ));

        let conflict = normalize(ResourceKind::ActionStatus, &response(424, json!({})));
        assert!(matches!(
            conflict.unwrap().payload,
            Payload::Status(OperationStatus::Conflict)
        ));

        let invalid = normalize(ResourceKind::ActionStatus, &response(400, json!({})));
        assert!(matches!(
            invalid.unwrap().payload,
            Payload::Status(OperationStatus::Invalid)
        ));
    }

    #[test]
    fn test_cli_in_use_error_coerces_to_conflict() {
        let resp = response(500, json!({"error": -5, "cli_error": "entry is used"}));
        let normalized = normalize(ResourceKind::ActionStatus, &resp).unwrap();
        assert!(matches!(
            normalized.payload,
            Payload::Status(OperationStatus::Conflict)
        ));
    }

    #[test]
    fn test_unexpected_action_failure_is_remote_error() {
        let resp = response(502, json!({}));
        let err = normalize(ResourceKind::ActionStatus, &resp).unwrap_err();
        assert!(matches!(err, EngineError::RemoteApi { status: 502, .. }));
    }

    #[test]
    fn test_detail_unwraps_single_element_array() {
        let resp = response(
            200,
            json!({"results": [{"seq-num": 3, "dst": "10.0.0.0/8", "gateway": "192.168.1.1"}]}),
        );
        let normalized = normalize(ResourceKind::RouteDetail, &resp).unwrap();
        match normalized.payload {
            Payload::Record(record) => assert_eq!(record["id"], json!(3)),
            other => panic!("expected record, got {:?}", other),
        }
    }

    #[test]
    fn test_detail_with_empty_results_fails() {
        let resp = response(200, json!({"results": []}));
        let err = normalize(ResourceKind::RouteDetail, &resp).unwrap_err();
        assert!(matches!(err, EngineError::Normalization(_)));
    }

    #[test]
    fn test_system_status_merges_envelope_fields() {
        let resp = response(
            200,
            json!({
                "results": {"hostname": "edge-fw", "model_name": "FortiGate-60F"},
                "version": "v7.4.3",
                "serial": "FGT60F000000"
            }),
        );
        let normalized = normalize(ResourceKind::SystemStatus, &resp).unwrap();
        match normalized.payload {
            Payload::Record(record) => {
                assert_eq!(record["hostname"], json!("edge-fw"));
                assert_eq!(record["version"], json!("v7.4.3"));
            }
            other => panic!("expected record, got {:?}", other),
        }
    }

    #[test]
    fn test_connection_test_adds_connected_flag() {
        let resp = response(200, json!({"results": {"hostname": "edge-fw"}}));
        let normalized = normalize(ResourceKind::ConnectionTest, &resp).unwrap();
        match normalized.payload {
            Payload::Record(record) => assert_eq!(record["connected"], json!(true)),
            other => panic!("expected record, got {:?}", other),
        }
    }

    #[test]
    fn test_vdom_list_surfaces_names() {
        let resp = response(
            200,
            json!({"results": [{"name": "root"}, {"name": "dmz"}]}),
        );
        let normalized = normalize(ResourceKind::VdomList, &resp).unwrap();
        assert_eq!(
            normalized.vdoms,
            Some(vec!["root".to_string(), "dmz".to_string()])
        );
    }

    #[test]
    fn test_cursor_passthrough() {
        let resp = response(
            200,
            json!({"results": [], "cursor": "eyJvZmZzZXQiOjUwfQ=="}),
        );
        let normalized = normalize(ResourceKind::AddressList, &resp).unwrap();
        assert_eq!(normalized.cursor.as_deref(), Some("eyJvZmZzZXQiOjUwfQ=="));
    }
}
