//! Command dispatch.
//!
//! The single entry point for executing a command against the engine.
//! Every call terminates in a [`ResultEnvelope`]; errors are folded into
//! failure envelopes and never escape as unstructured failures.
//!
//! Engine-local commands (registry management, health, schema
//! introspection) are handled before any device resolution. Remote
//! commands run the full pipeline: registry lookup, endpoint resolution,
//! VDOM validation, authenticated execution, normalization.

use crate::endpoints::{self, ResolvedCall};
use crate::envelope::{OperationStatus, Payload, ResultEnvelope};
use crate::error::{EngineError, Result};
use crate::normalize;
use crate::registry::DeviceRegistry;
use crate::session::DeviceSession;
use fortigate_config::{DeviceConfig, DevicesConfig};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::{debug, instrument};

/// The command dispatch engine.
#[derive(Debug)]
pub struct Dispatcher {
    registry: Arc<DeviceRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<DeviceRegistry>) -> Self {
        Self { registry }
    }

    /// Build a dispatcher with all configured devices registered.
    pub fn from_config(config: &DevicesConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(DeviceRegistry::from_config(config)?)))
    }

    pub fn registry(&self) -> &Arc<DeviceRegistry> {
        &self.registry
    }

    /// Execute a command. Never fails; errors become failure envelopes.
    #[instrument(skip(self, params))]
    pub async fn dispatch(
        &self,
        command: &str,
        device: Option<&str>,
        params: Value,
    ) -> ResultEnvelope {
        match self.run(command, device, params).await {
            Ok(envelope) => envelope,
            Err(e) => {
                debug!(error = %e, "command failed");
                ResultEnvelope::failure(&e)
            }
        }
    }

    async fn run(
        &self,
        command: &str,
        device: Option<&str>,
        params: Value,
    ) -> Result<ResultEnvelope> {
        let params = params_object(params)?;

        match command {
            "list_devices" => return self.list_devices(),
            "add_device" => return self.add_device(device, &params),
            "remove_device" => return self.remove_device(device).await,
            "health" => return self.health(),
            "get_schema_info" => return Ok(schema_info()),
            _ => {}
        }

        let device = device.ok_or_else(|| {
            EngineError::invalid_parameter("device", "required parameter is missing")
        })?;
        let session = self.registry.get(device)?;
        let call = endpoints::resolve(command, &params)?;
        self.execute(&session, call).await
    }

    async fn execute(
        &self,
        session: &Arc<DeviceSession>,
        call: ResolvedCall,
    ) -> Result<ResultEnvelope> {
        let vdom = if call.spec.vdom_scoped {
            Some(session.effective_vdom(call.vdom.as_deref())?)
        } else {
            None
        };

        let response = session
            .call(
                call.spec.method.clone(),
                &call.path,
                vdom.as_deref(),
                call.body.as_ref(),
            )
            .await?;

        // Remote API and normalization failures happen after a successful
        // HTTP exchange; fold them into the device's health record too.
        let normalized = normalize::normalize(call.spec.kind, &response)
            .inspect_err(|e| session.record_failure(e))?;
        if let Some(vdoms) = normalized.vdoms {
            session.record_vdoms(vdoms);
        }
        Ok(ResultEnvelope::ok_with_cursor(
            normalized.payload,
            normalized.cursor,
        ))
    }

    fn list_devices(&self) -> Result<ResultEnvelope> {
        let records = self
            .registry
            .list()
            .iter()
            .map(|session| {
                let health = session.health();
                json!({
                    "id": session.name(),
                    "host": session.host(),
                    "port": session.port(),
                    "vdom": session.default_vdom(),
                    "healthy": health.healthy,
                })
            })
            .collect();
        Ok(ResultEnvelope::ok(Payload::Records(records)))
    }

    fn add_device(&self, device: Option<&str>, params: &Map<String, Value>) -> Result<ResultEnvelope> {
        let name = device.ok_or_else(|| {
            EngineError::invalid_parameter("device", "required parameter is missing")
        })?;
        let config: DeviceConfig = serde_json::from_value(Value::Object(params.clone()))
            .map_err(|e| EngineError::invalid_parameter("device", e.to_string()))?;
        config
            .validate()
            .map_err(|reason| EngineError::invalid_parameter("device", reason))?;
        self.registry.add(name, &config)?;
        Ok(ResultEnvelope::ok(Payload::Status(OperationStatus::Ok)))
    }

    async fn remove_device(&self, device: Option<&str>) -> Result<ResultEnvelope> {
        let name = device.ok_or_else(|| {
            EngineError::invalid_parameter("device", "required parameter is missing")
        })?;
        let session = self.registry.remove(name)?;
        session.shutdown().await;
        Ok(ResultEnvelope::ok(Payload::Status(OperationStatus::Ok)))
    }

    fn health(&self) -> Result<ResultEnvelope> {
        let sessions = self.registry.list();
        let devices: Vec<Value> = sessions
            .iter()
            .map(|session| {
                let health = session.health();
                json!({
                    "id": session.name(),
                    "healthy": health.healthy,
                    "last_contact": health.last_contact,
                    "last_error": health.last_error,
                })
            })
            .collect();
        let healthy = devices
            .iter()
            .filter(|d| d["healthy"] == Value::Bool(true))
            .count();
        Ok(ResultEnvelope::ok(Payload::Record(json!({
            "devices": sessions.len(),
            "healthy": healthy,
            "details": devices,
        }))))
    }
}

/// Schema introspection derived from the endpoint table.
fn schema_info() -> ResultEnvelope {
    let records = endpoints::all_specs()
        .map(|spec| {
            json!({
                "command": spec.command,
                "method": spec.method.as_str(),
                "path": spec.path,
                "required": spec.required.iter().map(|p| p.name).collect::<Vec<_>>(),
                "optional": spec.optional.iter().map(|p| p.name).collect::<Vec<_>>(),
                "vdom_scoped": spec.vdom_scoped,
            })
        })
        .collect();
    ResultEnvelope::ok(Payload::Records(records))
}

fn params_object(params: Value) -> Result<Map<String, Value>> {
    match params {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => Ok(map),
        _ => Err(EngineError::invalid_parameter(
            "params",
            "must be a JSON object",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(DeviceRegistry::new()))
    }

    #[tokio::test]
    async fn test_unknown_command_envelope() {
        let envelope = dispatcher()
            .dispatch("explode", Some("fw1"), Value::Null)
            .await;
        assert!(!envelope.success);
        let error = envelope.error.unwrap();
        // Device lookup runs first, so an unregistered device wins.
        assert_eq!(error.kind, "device_not_found");
    }

    #[tokio::test]
    async fn test_missing_device_parameter() {
        let envelope = dispatcher()
            .dispatch("list_firewall_policies", None, Value::Null)
            .await;
        let error = envelope.error.unwrap();
        assert_eq!(error.kind, "invalid_parameter");
        assert!(error.message.contains("device"));
    }

    #[tokio::test]
    async fn test_list_devices_empty() {
        let envelope = dispatcher().dispatch("list_devices", None, Value::Null).await;
        assert!(envelope.success);
        assert_eq!(envelope.data, Some(Payload::Records(vec![])));
    }

    #[tokio::test]
    async fn test_add_device_requires_name() {
        let envelope = dispatcher()
            .dispatch("add_device", None, serde_json::json!({"host": "192.0.2.1"}))
            .await;
        assert_eq!(envelope.error.unwrap().kind, "invalid_parameter");
    }

    #[tokio::test]
    async fn test_add_and_remove_device() {
        let dispatcher = dispatcher();
        let envelope = dispatcher
            .dispatch(
                "add_device",
                Some("fw1"),
                serde_json::json!({"host": "192.0.2.1", "api_token": "tok"}),
            )
            .await;
        assert!(envelope.success, "{:?}", envelope.error);
        assert_eq!(dispatcher.registry().len(), 1);

        let envelope = dispatcher
            .dispatch("remove_device", Some("fw1"), Value::Null)
            .await;
        assert!(envelope.success);
        assert!(dispatcher.registry().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_add_device() {
        let dispatcher = dispatcher();
        let params = serde_json::json!({"host": "192.0.2.1", "api_token": "tok"});
        dispatcher.dispatch("add_device", Some("fw1"), params.clone()).await;
        let envelope = dispatcher.dispatch("add_device", Some("fw1"), params).await;
        assert_eq!(envelope.error.unwrap().kind, "duplicate_device");
    }

    #[tokio::test]
    async fn test_schema_info_lists_commands() {
        let envelope = dispatcher().dispatch("get_schema_info", None, Value::Null).await;
        let Some(Payload::Records(records)) = envelope.data else {
            panic!("expected records");
        };
        assert!(records.iter().any(|r| r["command"] == "list_firewall_policies"));
        assert!(records.iter().any(|r| r["command"] == "create_static_route"));
    }

    #[tokio::test]
    async fn test_health_reports_device_count() {
        let dispatcher = dispatcher();
        dispatcher
            .dispatch(
                "add_device",
                Some("fw1"),
                serde_json::json!({"host": "192.0.2.1", "api_token": "tok"}),
            )
            .await;
        let envelope = dispatcher.dispatch("health", None, Value::Null).await;
        let Some(Payload::Record(record)) = envelope.data else {
            panic!("expected record");
        };
        assert_eq!(record["devices"], serde_json::json!(1));
        assert_eq!(record["healthy"], serde_json::json!(0));
    }

    #[tokio::test]
    async fn test_params_must_be_object() {
        let envelope = dispatcher()
            .dispatch("list_devices", None, serde_json::json!([1, 2]))
            .await;
        assert_eq!(envelope.error.unwrap().kind, "invalid_parameter");
    }
}
