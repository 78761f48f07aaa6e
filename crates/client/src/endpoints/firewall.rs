//! Firewall policy endpoints.

use super::{BodyMode, EndpointSpec, ParamSpec, ResourceFamily, ResourceKind};
use reqwest::Method;

const ACTIONS: &[&str] = &["accept", "deny"];
const TOGGLE: &[&str] = &["enable", "disable"];

pub(super) static SPECS: &[EndpointSpec] = &[
    EndpointSpec {
        command: "list_firewall_policies",
        family: ResourceFamily::FirewallPolicy,
        method: Method::GET,
        path: "cmdb/firewall/policy",
        required: &[],
        optional: &[],
        body: BodyMode::None,
        vdom_scoped: true,
        kind: ResourceKind::PolicyList,
    },
    EndpointSpec {
        command: "create_firewall_policy",
        family: ResourceFamily::FirewallPolicy,
        method: Method::POST,
        path: "cmdb/firewall/policy",
        required: &[
            ParamSpec::plain("name"),
            ParamSpec::members("srcintf"),
            ParamSpec::members("dstintf"),
            ParamSpec::members("srcaddr"),
            ParamSpec::members("dstaddr"),
            ParamSpec::enumerated("action", ACTIONS),
        ],
        optional: &[
            ParamSpec::members("service"),
            ParamSpec::plain("schedule"),
            ParamSpec::enumerated("nat", TOGGLE),
            ParamSpec::enumerated("status", TOGGLE),
            ParamSpec::plain("comments"),
        ],
        body: BodyMode::FromParams,
        vdom_scoped: true,
        kind: ResourceKind::ActionStatus,
    },
    EndpointSpec {
        command: "update_firewall_policy",
        family: ResourceFamily::FirewallPolicy,
        method: Method::PUT,
        path: "cmdb/firewall/policy/{policy_id}",
        required: &[ParamSpec::plain("policy_id")],
        optional: &[
            ParamSpec::plain("name"),
            ParamSpec::members("srcintf"),
            ParamSpec::members("dstintf"),
            ParamSpec::members("srcaddr"),
            ParamSpec::members("dstaddr"),
            ParamSpec::enumerated("action", ACTIONS),
            ParamSpec::members("service"),
            ParamSpec::plain("schedule"),
            ParamSpec::enumerated("nat", TOGGLE),
            ParamSpec::enumerated("status", TOGGLE),
            ParamSpec::plain("comments"),
        ],
        body: BodyMode::FromParams,
        vdom_scoped: true,
        kind: ResourceKind::ActionStatus,
    },
    EndpointSpec {
        command: "delete_firewall_policy",
        family: ResourceFamily::FirewallPolicy,
        method: Method::DELETE,
        path: "cmdb/firewall/policy/{policy_id}",
        required: &[ParamSpec::plain("policy_id")],
        optional: &[],
        body: BodyMode::None,
        vdom_scoped: true,
        kind: ResourceKind::ActionStatus,
    },
];
