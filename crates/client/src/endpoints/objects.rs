//! Address and service object endpoints.

use super::{BodyMode, EndpointSpec, ParamSpec, ResourceFamily, ResourceKind};
use reqwest::Method;

const ADDRESS_TYPES: &[&str] = &["ipmask", "iprange", "fqdn"];
const PROTOCOLS: &[&str] = &["tcp", "udp", "icmp"];

pub(super) static SPECS: &[EndpointSpec] = &[
    EndpointSpec {
        command: "list_address_objects",
        family: ResourceFamily::AddressObject,
        method: Method::GET,
        path: "cmdb/firewall/address",
        required: &[],
        optional: &[],
        body: BodyMode::None,
        vdom_scoped: true,
        kind: ResourceKind::AddressList,
    },
    // The vendor key for the address value depends on address_type; the
    // rename here covers the common ipmask case, and the normalizer reads
    // all three shapes back.
    EndpointSpec {
        command: "create_address_object",
        family: ResourceFamily::AddressObject,
        method: Method::POST,
        path: "cmdb/firewall/address",
        required: &[
            ParamSpec::plain("name"),
            ParamSpec::enumerated("address_type", ADDRESS_TYPES),
            ParamSpec::renamed("address", "subnet"),
        ],
        optional: &[ParamSpec::plain("comment")],
        body: BodyMode::FromParams,
        vdom_scoped: true,
        kind: ResourceKind::ActionStatus,
    },
    EndpointSpec {
        command: "delete_address_object",
        family: ResourceFamily::AddressObject,
        method: Method::DELETE,
        path: "cmdb/firewall/address/{name}",
        required: &[ParamSpec::plain("name")],
        optional: &[],
        body: BodyMode::None,
        vdom_scoped: true,
        kind: ResourceKind::ActionStatus,
    },
    EndpointSpec {
        command: "list_service_objects",
        family: ResourceFamily::ServiceObject,
        method: Method::GET,
        path: "cmdb/firewall.service/custom",
        required: &[],
        optional: &[],
        body: BodyMode::None,
        vdom_scoped: true,
        kind: ResourceKind::ServiceList,
    },
    EndpointSpec {
        command: "create_service_object",
        family: ResourceFamily::ServiceObject,
        method: Method::POST,
        path: "cmdb/firewall.service/custom",
        required: &[
            ParamSpec::plain("name"),
            ParamSpec::enumerated("protocol", PROTOCOLS),
        ],
        optional: &[
            ParamSpec::plain("port"),
            ParamSpec::plain("comment"),
        ],
        body: BodyMode::FromParams,
        vdom_scoped: true,
        kind: ResourceKind::ActionStatus,
    },
    EndpointSpec {
        command: "delete_service_object",
        family: ResourceFamily::ServiceObject,
        method: Method::DELETE,
        path: "cmdb/firewall.service/custom/{name}",
        required: &[ParamSpec::plain("name")],
        optional: &[],
        body: BodyMode::None,
        vdom_scoped: true,
        kind: ResourceKind::ActionStatus,
    },
];
