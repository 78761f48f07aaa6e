//! Static route and routing table endpoints.

use super::{BodyMode, EndpointSpec, ParamSpec, ResourceFamily, ResourceKind};
use reqwest::Method;

pub(super) static SPECS: &[EndpointSpec] = &[
    EndpointSpec {
        command: "list_static_routes",
        family: ResourceFamily::StaticRoute,
        method: Method::GET,
        path: "cmdb/router/static",
        required: &[],
        optional: &[],
        body: BodyMode::None,
        vdom_scoped: true,
        kind: ResourceKind::RouteList,
    },
    EndpointSpec {
        command: "get_static_route_detail",
        family: ResourceFamily::StaticRoute,
        method: Method::GET,
        path: "cmdb/router/static/{route_id}",
        required: &[ParamSpec::plain("route_id")],
        optional: &[],
        body: BodyMode::None,
        vdom_scoped: true,
        kind: ResourceKind::RouteDetail,
    },
    EndpointSpec {
        command: "create_static_route",
        family: ResourceFamily::StaticRoute,
        method: Method::POST,
        path: "cmdb/router/static",
        required: &[
            ParamSpec::renamed("destination", "dst"),
            ParamSpec::plain("gateway"),
        ],
        optional: &[
            ParamSpec::renamed("interface", "device"),
            ParamSpec::plain("distance"),
        ],
        body: BodyMode::FromParams,
        vdom_scoped: true,
        kind: ResourceKind::ActionStatus,
    },
    EndpointSpec {
        command: "update_static_route",
        family: ResourceFamily::StaticRoute,
        method: Method::PUT,
        path: "cmdb/router/static/{route_id}",
        required: &[ParamSpec::plain("route_id")],
        optional: &[
            ParamSpec::renamed("destination", "dst"),
            ParamSpec::plain("gateway"),
            ParamSpec::renamed("interface", "device"),
            ParamSpec::plain("distance"),
        ],
        body: BodyMode::FromParams,
        vdom_scoped: true,
        kind: ResourceKind::ActionStatus,
    },
    EndpointSpec {
        command: "delete_static_route",
        family: ResourceFamily::StaticRoute,
        method: Method::DELETE,
        path: "cmdb/router/static/{route_id}",
        required: &[ParamSpec::plain("route_id")],
        optional: &[],
        body: BodyMode::None,
        vdom_scoped: true,
        kind: ResourceKind::ActionStatus,
    },
    EndpointSpec {
        command: "get_routing_table",
        family: ResourceFamily::StaticRoute,
        method: Method::GET,
        path: "monitor/router/ipv4",
        required: &[],
        optional: &[],
        body: BodyMode::None,
        vdom_scoped: true,
        kind: ResourceKind::RoutingTable,
    },
];
