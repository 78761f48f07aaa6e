//! Device-level endpoints: connectivity probe and VDOM discovery.

use super::{BodyMode, EndpointSpec, ResourceFamily, ResourceKind};
use reqwest::Method;

pub(super) static SPECS: &[EndpointSpec] = &[
    EndpointSpec {
        command: "test_connection",
        family: ResourceFamily::Device,
        method: Method::GET,
        path: "monitor/system/status",
        required: &[],
        optional: &[],
        body: BodyMode::None,
        vdom_scoped: true,
        kind: ResourceKind::ConnectionTest,
    },
    EndpointSpec {
        command: "test_device_connection",
        family: ResourceFamily::Device,
        method: Method::GET,
        path: "monitor/system/status",
        required: &[],
        optional: &[],
        body: BodyMode::None,
        vdom_scoped: true,
        kind: ResourceKind::ConnectionTest,
    },
    // VDOM inventory lives at global scope; the call never carries a vdom
    // query parameter.
    EndpointSpec {
        command: "discover_vdoms",
        family: ResourceFamily::Device,
        method: Method::GET,
        path: "cmdb/system/vdom",
        required: &[],
        optional: &[],
        body: BodyMode::None,
        vdom_scoped: false,
        kind: ResourceKind::VdomList,
    },
];
