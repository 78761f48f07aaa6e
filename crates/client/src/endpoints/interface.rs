//! Network interface endpoints.

use super::{BodyMode, EndpointSpec, ParamSpec, ResourceFamily, ResourceKind};
use reqwest::Method;

pub(super) static SPECS: &[EndpointSpec] = &[
    EndpointSpec {
        command: "list_interfaces",
        family: ResourceFamily::Interface,
        method: Method::GET,
        path: "cmdb/system/interface",
        required: &[],
        optional: &[],
        body: BodyMode::None,
        vdom_scoped: true,
        kind: ResourceKind::InterfaceList,
    },
    // The monitor endpoint filters by interface through a query parameter
    // baked into the template; the vdom parameter appends with '&'.
    EndpointSpec {
        command: "get_interface_status",
        family: ResourceFamily::Interface,
        method: Method::GET,
        path: "monitor/system/interface?interface={name}",
        required: &[ParamSpec::plain("name")],
        optional: &[],
        body: BodyMode::None,
        vdom_scoped: true,
        kind: ResourceKind::InterfaceStatus,
    },
];
