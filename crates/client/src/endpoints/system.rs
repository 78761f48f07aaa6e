//! System status endpoints.

use super::{BodyMode, EndpointSpec, ResourceFamily, ResourceKind};
use reqwest::Method;

pub(super) static SPECS: &[EndpointSpec] = &[EndpointSpec {
    command: "get_device_status",
    family: ResourceFamily::System,
    method: Method::GET,
    path: "monitor/system/status",
    required: &[],
    optional: &[],
    body: BodyMode::None,
    vdom_scoped: true,
    kind: ResourceKind::SystemStatus,
}];
