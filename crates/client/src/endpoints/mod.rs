//! Command-to-endpoint resolution.
//!
//! The engine's command surface is a closed set. Each command maps to a
//! static [`EndpointSpec`] describing the HTTP method, path template,
//! parameter validation rules, and normalizer selector. The table is
//! partitioned by resource family across the submodules and assembled once
//! at first use; a malformed table entry is a programming error and panics
//! at startup rather than surfacing per-call.
//!
//! Resolution is pure: no network I/O happens here, and validation always
//! runs before the dispatcher builds a request.

mod device;
mod firewall;
mod interface;
mod objects;
mod routing;
mod system;
mod virtual_ip;

use crate::error::{EngineError, Result};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Method;
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Resource family a command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceFamily {
    Device,
    FirewallPolicy,
    AddressObject,
    ServiceObject,
    VirtualIp,
    StaticRoute,
    Interface,
    System,
}

/// Normalizer selector: which payload shape the endpoint produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    PolicyList,
    AddressList,
    ServiceList,
    VipList,
    VipDetail,
    RouteList,
    RouteDetail,
    RoutingTable,
    InterfaceList,
    InterfaceStatus,
    SystemStatus,
    ConnectionTest,
    /// Reserved path: extracts VDOM names and updates the device session.
    VdomList,
    /// Create/update/delete results collapse to a scalar status.
    ActionStatus,
}

/// Declarative validation rule for one parameter.
#[derive(Debug)]
pub struct ParamSpec {
    /// External parameter name.
    pub name: &'static str,
    /// Vendor body key, when it differs from the external name.
    pub vendor_key: Option<&'static str>,
    /// Closed set of legal values for enumerated fields.
    pub allowed: Option<&'static [&'static str]>,
    /// Vendor expects a member-name list (`[{"name": ...}]`); accepts a
    /// string or an array of strings externally.
    pub member_list: bool,
}

impl ParamSpec {
    const fn plain(name: &'static str) -> Self {
        Self {
            name,
            vendor_key: None,
            allowed: None,
            member_list: false,
        }
    }

    const fn renamed(name: &'static str, vendor_key: &'static str) -> Self {
        Self {
            name,
            vendor_key: Some(vendor_key),
            allowed: None,
            member_list: false,
        }
    }

    const fn enumerated(name: &'static str, allowed: &'static [&'static str]) -> Self {
        Self {
            name,
            vendor_key: None,
            allowed: Some(allowed),
            member_list: false,
        }
    }

    const fn members(name: &'static str) -> Self {
        Self {
            name,
            vendor_key: None,
            allowed: None,
            member_list: true,
        }
    }

    fn body_key(&self) -> &'static str {
        self.vendor_key.unwrap_or(self.name)
    }
}

/// Whether the endpoint carries a JSON body built from the parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyMode {
    None,
    FromParams,
}

/// Static descriptor mapping a command to a concrete remote call shape.
#[derive(Debug)]
pub struct EndpointSpec {
    pub command: &'static str,
    pub family: ResourceFamily,
    pub method: Method,
    /// Path template relative to the `/api/v2` base, with `{placeholders}`
    /// filled from required parameters.
    pub path: &'static str,
    pub required: &'static [ParamSpec],
    pub optional: &'static [ParamSpec],
    pub body: BodyMode,
    /// Whether the effective VDOM is appended as a query parameter.
    pub vdom_scoped: bool,
    pub kind: ResourceKind,
}

/// The assembled command table.
///
/// Panics on duplicate command names or path placeholders without a
/// matching required parameter; both are startup-fatal configuration
/// errors, not per-call failures.
static COMMAND_TABLE: LazyLock<HashMap<&'static str, &'static EndpointSpec>> =
    LazyLock::new(|| {
        let mut table = HashMap::new();
        let families: [&[EndpointSpec]; 7] = [
            device::SPECS,
            firewall::SPECS,
            objects::SPECS,
            virtual_ip::SPECS,
            routing::SPECS,
            interface::SPECS,
            system::SPECS,
        ];
        for specs in families {
            for spec in specs {
                for placeholder in path_placeholders(spec.path) {
                    assert!(
                        spec.required.iter().any(|p| p.name == placeholder),
                        "endpoint '{}': path placeholder '{{{}}}' has no required parameter",
                        spec.command,
                        placeholder
                    );
                }
                let previous = table.insert(spec.command, spec);
                assert!(
                    previous.is_none(),
                    "duplicate command '{}' in endpoint table",
                    spec.command
                );
            }
        }
        table
    });

fn path_placeholders(path: &str) -> impl Iterator<Item = &str> {
    path.split('{')
        .skip(1)
        .filter_map(|rest| rest.split('}').next())
}

/// A resolved, validated call ready for execution.
#[derive(Debug)]
pub struct ResolvedCall {
    pub spec: &'static EndpointSpec,
    /// Path with placeholders substituted and percent-encoded.
    pub path: String,
    /// JSON body for POST/PUT endpoints.
    pub body: Option<Value>,
    /// Per-call VDOM override from the parameters, if any.
    pub vdom: Option<String>,
}

/// Resolve a command name plus parameters to a concrete call.
///
/// Pure function: fails with [`EngineError::UnknownCommand`] or
/// [`EngineError::InvalidParameter`] before any network I/O.
pub fn resolve(command: &str, params: &Map<String, Value>) -> Result<ResolvedCall> {
    let spec = COMMAND_TABLE
        .get(command)
        .copied()
        .ok_or_else(|| EngineError::UnknownCommand(command.to_string()))?;

    for param in spec.required {
        let value = params.get(param.name).ok_or_else(|| {
            EngineError::invalid_parameter(param.name, "required parameter is missing")
        })?;
        validate_value(param, value)?;
    }
    for param in spec.optional {
        if let Some(value) = params.get(param.name) {
            validate_value(param, value)?;
        }
    }

    let vdom = match params.get("vdom") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::String(_)) | None => None,
        Some(_) => {
            return Err(EngineError::invalid_parameter("vdom", "must be a string"));
        }
    };

    let path = substitute_path(spec, params)?;
    let body = match spec.body {
        BodyMode::None => None,
        BodyMode::FromParams => Some(build_body(spec, params)?),
    };

    Ok(ResolvedCall {
        spec,
        path,
        body,
        vdom,
    })
}

/// Look up a command without validating parameters (schema introspection).
pub fn spec_for(command: &str) -> Option<&'static EndpointSpec> {
    COMMAND_TABLE.get(command).copied()
}

/// All registered endpoint specs in a stable family grouping.
pub fn all_specs() -> impl Iterator<Item = &'static EndpointSpec> {
    let families: [&'static [EndpointSpec]; 7] = [
        device::SPECS,
        firewall::SPECS,
        objects::SPECS,
        virtual_ip::SPECS,
        routing::SPECS,
        interface::SPECS,
        system::SPECS,
    ];
    families.into_iter().flatten()
}

fn validate_value(param: &ParamSpec, value: &Value) -> Result<()> {
    if param.member_list {
        return match value {
            Value::String(s) if !s.is_empty() => Ok(()),
            Value::Array(items)
                if !items.is_empty()
                    && items
                        .iter()
                        .all(|i| i.as_str().is_some_and(|s| !s.is_empty())) =>
            {
                Ok(())
            }
            _ => Err(EngineError::invalid_parameter(
                param.name,
                "must be a non-empty string or array of strings",
            )),
        };
    }

    let text = scalar_text(value).ok_or_else(|| {
        EngineError::invalid_parameter(param.name, "must be a scalar value")
    })?;
    if text.trim().is_empty() {
        return Err(EngineError::invalid_parameter(
            param.name,
            "must not be empty",
        ));
    }
    if let Some(allowed) = param.allowed
        && !allowed.contains(&text.as_str())
    {
        return Err(EngineError::invalid_parameter(
            param.name,
            format!("must be one of [{}]", allowed.join(", ")),
        ));
    }
    Ok(())
}

/// Render a scalar JSON value as text for paths and enum checks.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn substitute_path(spec: &EndpointSpec, params: &Map<String, Value>) -> Result<String> {
    let mut path = spec.path.to_string();
    for placeholder in path_placeholders(spec.path) {
        let value = params
            .get(placeholder)
            .and_then(scalar_text)
            .ok_or_else(|| {
                EngineError::invalid_parameter(placeholder, "required parameter is missing")
            })?;
        let encoded = utf8_percent_encode(&value, NON_ALPHANUMERIC).to_string();
        path = path.replace(&format!("{{{}}}", placeholder), &encoded);
    }
    Ok(path)
}

/// Build the vendor JSON body from the external parameters.
///
/// Declared parameters are renamed to their vendor keys and member lists
/// expanded; undeclared extra parameters pass through under their own
/// names, matching the original server's data-object passthrough. Path
/// placeholders and the `vdom` override never reach the body.
fn build_body(spec: &EndpointSpec, params: &Map<String, Value>) -> Result<Value> {
    let path_params: Vec<&str> = path_placeholders(spec.path).collect();
    let mut body = Map::new();

    for (key, value) in params {
        if key == "vdom" || path_params.contains(&key.as_str()) {
            continue;
        }
        let declared = spec
            .required
            .iter()
            .chain(spec.optional.iter())
            .find(|p| p.name == key);
        match declared {
            Some(param) if param.member_list => {
                body.insert(param.body_key().to_string(), member_list_value(value));
            }
            Some(param) => {
                body.insert(param.body_key().to_string(), value.clone());
            }
            None => {
                body.insert(key.clone(), value.clone());
            }
        }
    }

    Ok(Value::Object(body))
}

fn member_list_value(value: &Value) -> Value {
    match value {
        Value::String(s) => json!([{ "name": s }]),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| json!({ "name": item.as_str().unwrap_or_default() }))
                .collect(),
        ),
        other => other.clone(),
    }
}
