//! Virtual IP (DNAT) endpoints.

use super::{BodyMode, EndpointSpec, ParamSpec, ResourceFamily, ResourceKind};
use reqwest::Method;

const TOGGLE: &[&str] = &["enable", "disable"];
const VIP_PROTOCOLS: &[&str] = &["tcp", "udp", "sctp", "icmp"];

pub(super) static SPECS: &[EndpointSpec] = &[
    EndpointSpec {
        command: "list_virtual_ips",
        family: ResourceFamily::VirtualIp,
        method: Method::GET,
        path: "cmdb/firewall/vip",
        required: &[],
        optional: &[],
        body: BodyMode::None,
        vdom_scoped: true,
        kind: ResourceKind::VipList,
    },
    EndpointSpec {
        command: "get_virtual_ip_detail",
        family: ResourceFamily::VirtualIp,
        method: Method::GET,
        path: "cmdb/firewall/vip/{name}",
        required: &[ParamSpec::plain("name")],
        optional: &[],
        body: BodyMode::None,
        vdom_scoped: true,
        kind: ResourceKind::VipDetail,
    },
    EndpointSpec {
        command: "create_virtual_ip",
        family: ResourceFamily::VirtualIp,
        method: Method::POST,
        path: "cmdb/firewall/vip",
        required: &[
            ParamSpec::plain("name"),
            ParamSpec::renamed("external_ip", "extip"),
            ParamSpec::renamed("mapped_ip", "mappedip"),
            ParamSpec::renamed("external_interface", "extintf"),
        ],
        optional: &[
            ParamSpec::enumerated("port_forward", TOGGLE),
            ParamSpec::enumerated("protocol", VIP_PROTOCOLS),
            ParamSpec::renamed("external_port", "extport"),
            ParamSpec::renamed("mapped_port", "mappedport"),
            ParamSpec::plain("comment"),
        ],
        body: BodyMode::FromParams,
        vdom_scoped: true,
        kind: ResourceKind::ActionStatus,
    },
    EndpointSpec {
        command: "update_virtual_ip",
        family: ResourceFamily::VirtualIp,
        method: Method::PUT,
        path: "cmdb/firewall/vip/{name}",
        required: &[ParamSpec::plain("name")],
        optional: &[
            ParamSpec::renamed("external_ip", "extip"),
            ParamSpec::renamed("mapped_ip", "mappedip"),
            ParamSpec::renamed("external_interface", "extintf"),
            ParamSpec::enumerated("port_forward", TOGGLE),
            ParamSpec::enumerated("protocol", VIP_PROTOCOLS),
            ParamSpec::renamed("external_port", "extport"),
            ParamSpec::renamed("mapped_port", "mappedport"),
            ParamSpec::plain("comment"),
        ],
        body: BodyMode::FromParams,
        vdom_scoped: true,
        kind: ResourceKind::ActionStatus,
    },
    EndpointSpec {
        command: "delete_virtual_ip",
        family: ResourceFamily::VirtualIp,
        method: Method::DELETE,
        path: "cmdb/firewall/vip/{name}",
        required: &[ParamSpec::plain("name")],
        optional: &[],
        body: BodyMode::None,
        vdom_scoped: true,
        kind: ResourceKind::ActionStatus,
    },
];
