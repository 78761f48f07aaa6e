//! Command-line argument definitions.
//!
//! Each leaf subcommand maps to exactly one engine command plus a JSON
//! parameter object; the mapping lives in `Command::into_invocation` so
//! the rest of the binary never touches clap types.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value, json};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "fortigate-cli",
    version,
    about = "Manage FortiGate firewalls over the REST API"
)]
pub struct Cli {
    /// Path to the devices configuration file.
    #[arg(long, global = true, env = "FORTIGATE_RPC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Target device identifier from the configuration.
    #[arg(short, long, global = true)]
    pub device: Option<String>,

    /// Virtual domain override for this call.
    #[arg(long, global = true)]
    pub vdom: Option<String>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Device registry and status commands.
    #[command(subcommand)]
    Device(DeviceCommand),
    /// Firewall policy commands.
    #[command(subcommand)]
    Policy(PolicyCommand),
    /// Address object commands.
    #[command(subcommand)]
    Address(AddressCommand),
    /// Service object commands.
    #[command(subcommand)]
    Service(ServiceCommand),
    /// Virtual IP commands.
    #[command(subcommand)]
    Vip(VipCommand),
    /// Static route and routing table commands.
    #[command(subcommand)]
    Route(RouteCommand),
    /// Network interface commands.
    #[command(subcommand)]
    Interface(InterfaceCommand),
    /// Engine health and schema introspection.
    #[command(subcommand)]
    System(SystemCommand),
}

#[derive(Debug, Subcommand)]
pub enum DeviceCommand {
    /// List registered devices.
    List,
    /// Show system status for a device.
    Status,
    /// Probe connectivity and authentication.
    Test,
    /// Discover the device's virtual domains.
    Vdoms,
    /// Register a device at runtime.
    Add(AddDeviceArgs),
    /// Remove a device from the registry.
    Remove,
}

#[derive(Debug, Args)]
pub struct AddDeviceArgs {
    #[arg(long)]
    pub host: String,
    #[arg(long)]
    pub port: Option<u16>,
    #[arg(long, conflicts_with_all = ["username", "password"])]
    pub api_token: Option<String>,
    #[arg(long, requires = "password")]
    pub username: Option<String>,
    #[arg(long, requires = "username")]
    pub password: Option<String>,
    #[arg(long)]
    pub default_vdom: Option<String>,
    #[arg(long)]
    pub verify_tls: bool,
    /// Request timeout in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Subcommand)]
pub enum PolicyCommand {
    /// List firewall policies.
    List,
    /// Create a firewall policy.
    Create(CreatePolicyArgs),
    /// Update fields on an existing policy.
    Update(UpdatePolicyArgs),
    /// Delete a policy by identifier.
    Delete { policy_id: u64 },
}

#[derive(Debug, Args)]
pub struct CreatePolicyArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, value_delimiter = ',')]
    pub srcintf: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub dstintf: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub srcaddr: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub dstaddr: Vec<String>,
    /// Policy action: accept or deny.
    #[arg(long)]
    pub action: String,
    #[arg(long, value_delimiter = ',')]
    pub service: Vec<String>,
    #[arg(long)]
    pub schedule: Option<String>,
    #[arg(long)]
    pub nat: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub comments: Option<String>,
}

#[derive(Debug, Args)]
pub struct UpdatePolicyArgs {
    pub policy_id: u64,
    /// Fields to change, as a JSON object.
    #[arg(long)]
    pub set: String,
}

#[derive(Debug, Subcommand)]
pub enum AddressCommand {
    /// List address objects.
    List,
    /// Create an address object.
    Create(CreateAddressArgs),
    /// Delete an address object by name.
    Delete { name: String },
}

#[derive(Debug, Args)]
pub struct CreateAddressArgs {
    #[arg(long)]
    pub name: String,
    /// Address type: ipmask, iprange, or fqdn.
    #[arg(long)]
    pub address_type: String,
    /// The address value: subnet, range, or domain name.
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub comment: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum ServiceCommand {
    /// List custom service objects.
    List,
    /// Create a service object.
    Create(CreateServiceArgs),
    /// Delete a service object by name.
    Delete { name: String },
}

#[derive(Debug, Args)]
pub struct CreateServiceArgs {
    #[arg(long)]
    pub name: String,
    /// Protocol: tcp, udp, or icmp.
    #[arg(long)]
    pub protocol: String,
    #[arg(long)]
    pub port: Option<String>,
    #[arg(long)]
    pub comment: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum VipCommand {
    /// List virtual IPs.
    List,
    /// Show one virtual IP.
    Show { name: String },
    /// Create a virtual IP.
    Create(CreateVipArgs),
    /// Update fields on an existing virtual IP.
    Update(UpdateVipArgs),
    /// Delete a virtual IP by name.
    Delete { name: String },
}

#[derive(Debug, Args)]
pub struct CreateVipArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub external_ip: String,
    #[arg(long)]
    pub mapped_ip: String,
    #[arg(long)]
    pub external_interface: String,
    #[arg(long)]
    pub port_forward: Option<String>,
    #[arg(long)]
    pub protocol: Option<String>,
    #[arg(long)]
    pub external_port: Option<String>,
    #[arg(long)]
    pub mapped_port: Option<String>,
    #[arg(long)]
    pub comment: Option<String>,
}

#[derive(Debug, Args)]
pub struct UpdateVipArgs {
    pub name: String,
    /// Fields to change, as a JSON object.
    #[arg(long)]
    pub set: String,
}

#[derive(Debug, Subcommand)]
pub enum RouteCommand {
    /// List configured static routes.
    List,
    /// Show one static route.
    Show { route_id: u64 },
    /// Create a static route.
    Create(CreateRouteArgs),
    /// Update fields on an existing route.
    Update(UpdateRouteArgs),
    /// Delete a static route by identifier.
    Delete { route_id: u64 },
    /// Show the live routing table.
    Table,
}

#[derive(Debug, Args)]
pub struct CreateRouteArgs {
    #[arg(long)]
    pub destination: String,
    #[arg(long)]
    pub gateway: String,
    #[arg(long)]
    pub interface: Option<String>,
    #[arg(long)]
    pub distance: Option<u32>,
}

#[derive(Debug, Args)]
pub struct UpdateRouteArgs {
    pub route_id: u64,
    /// Fields to change, as a JSON object.
    #[arg(long)]
    pub set: String,
}

#[derive(Debug, Subcommand)]
pub enum InterfaceCommand {
    /// List network interfaces.
    List,
    /// Show live status for one interface.
    Status { name: String },
}

#[derive(Debug, Subcommand)]
pub enum SystemCommand {
    /// Engine health: device count and per-device state.
    Health,
    /// The command schema derived from the endpoint table.
    Schema,
}

/// An engine invocation: command name plus parameter object.
pub struct Invocation {
    pub command: &'static str,
    pub params: Value,
    /// Whether the command targets a device (requires `--device`).
    pub device_scoped: bool,
}

impl Command {
    /// Map the parsed subcommand to an engine invocation.
    ///
    /// `--set` JSON arguments are parsed here so malformed input fails
    /// before any dispatch.
    pub fn into_invocation(self) -> anyhow::Result<Invocation> {
        let (command, params, device_scoped) = match self {
            Command::Device(cmd) => match cmd {
                DeviceCommand::List => ("list_devices", json!({}), false),
                DeviceCommand::Status => ("get_device_status", json!({}), true),
                DeviceCommand::Test => ("test_device_connection", json!({}), true),
                DeviceCommand::Vdoms => ("discover_vdoms", json!({}), true),
                DeviceCommand::Add(args) => ("add_device", add_device_params(args), true),
                DeviceCommand::Remove => ("remove_device", json!({}), true),
            },
            Command::Policy(cmd) => match cmd {
                PolicyCommand::List => ("list_firewall_policies", json!({}), true),
                PolicyCommand::Create(args) => {
                    ("create_firewall_policy", create_policy_params(args), true)
                }
                PolicyCommand::Update(args) => {
                    let mut params = parse_set(&args.set)?;
                    params.insert("policy_id".to_string(), json!(args.policy_id));
                    ("update_firewall_policy", Value::Object(params), true)
                }
                PolicyCommand::Delete { policy_id } => (
                    "delete_firewall_policy",
                    json!({"policy_id": policy_id}),
                    true,
                ),
            },
            Command::Address(cmd) => match cmd {
                AddressCommand::List => ("list_address_objects", json!({}), true),
                AddressCommand::Create(args) => {
                    let mut params = Map::new();
                    params.insert("name".to_string(), json!(args.name));
                    params.insert("address_type".to_string(), json!(args.address_type));
                    params.insert("address".to_string(), json!(args.address));
                    insert_opt(&mut params, "comment", args.comment);
                    ("create_address_object", Value::Object(params), true)
                }
                AddressCommand::Delete { name } => {
                    ("delete_address_object", json!({"name": name}), true)
                }
            },
            Command::Service(cmd) => match cmd {
                ServiceCommand::List => ("list_service_objects", json!({}), true),
                ServiceCommand::Create(args) => {
                    let mut params = Map::new();
                    params.insert("name".to_string(), json!(args.name));
                    params.insert("protocol".to_string(), json!(args.protocol));
                    insert_opt(&mut params, "port", args.port);
                    insert_opt(&mut params, "comment", args.comment);
                    ("create_service_object", Value::Object(params), true)
                }
                ServiceCommand::Delete { name } => {
                    ("delete_service_object", json!({"name": name}), true)
                }
            },
            Command::Vip(cmd) => match cmd {
                VipCommand::List => ("list_virtual_ips", json!({}), true),
                VipCommand::Show { name } => ("get_virtual_ip_detail", json!({"name": name}), true),
                VipCommand::Create(args) => ("create_virtual_ip", create_vip_params(args), true),
                VipCommand::Update(args) => {
                    let mut params = parse_set(&args.set)?;
                    params.insert("name".to_string(), json!(args.name));
                    ("update_virtual_ip", Value::Object(params), true)
                }
                VipCommand::Delete { name } => ("delete_virtual_ip", json!({"name": name}), true),
            },
            Command::Route(cmd) => match cmd {
                RouteCommand::List => ("list_static_routes", json!({}), true),
                RouteCommand::Show { route_id } => (
                    "get_static_route_detail",
                    json!({"route_id": route_id}),
                    true,
                ),
                RouteCommand::Create(args) => {
                    let mut params = Map::new();
                    params.insert("destination".to_string(), json!(args.destination));
                    params.insert("gateway".to_string(), json!(args.gateway));
                    insert_opt(&mut params, "interface", args.interface);
                    if let Some(distance) = args.distance {
                        params.insert("distance".to_string(), json!(distance));
                    }
                    ("create_static_route", Value::Object(params), true)
                }
                RouteCommand::Update(args) => {
                    let mut params = parse_set(&args.set)?;
                    params.insert("route_id".to_string(), json!(args.route_id));
                    ("update_static_route", Value::Object(params), true)
                }
                RouteCommand::Delete { route_id } => {
                    ("delete_static_route", json!({"route_id": route_id}), true)
                }
                RouteCommand::Table => ("get_routing_table", json!({}), true),
            },
            Command::Interface(cmd) => match cmd {
                InterfaceCommand::List => ("list_interfaces", json!({}), true),
                InterfaceCommand::Status { name } => {
                    ("get_interface_status", json!({"name": name}), true)
                }
            },
            Command::System(cmd) => match cmd {
                SystemCommand::Health => ("health", json!({}), false),
                SystemCommand::Schema => ("get_schema_info", json!({}), false),
            },
        };
        Ok(Invocation {
            command,
            params,
            device_scoped,
        })
    }
}

fn parse_set(set: &str) -> anyhow::Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(set)
        .map_err(|e| anyhow::anyhow!("--set must be a JSON object: {}", e))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(anyhow::anyhow!("--set must be a JSON object")),
    }
}

fn insert_opt(params: &mut Map<String, Value>, key: &str, value: Option<String>) {
    if let Some(value) = value {
        params.insert(key.to_string(), json!(value));
    }
}

fn member_value(values: &[String]) -> Value {
    json!(values)
}

fn create_policy_params(args: CreatePolicyArgs) -> Value {
    let mut params = Map::new();
    params.insert("name".to_string(), json!(args.name));
    params.insert("srcintf".to_string(), member_value(&args.srcintf));
    params.insert("dstintf".to_string(), member_value(&args.dstintf));
    params.insert("srcaddr".to_string(), member_value(&args.srcaddr));
    params.insert("dstaddr".to_string(), member_value(&args.dstaddr));
    params.insert("action".to_string(), json!(args.action));
    if !args.service.is_empty() {
        params.insert("service".to_string(), member_value(&args.service));
    }
    insert_opt(&mut params, "schedule", args.schedule);
    insert_opt(&mut params, "nat", args.nat);
    insert_opt(&mut params, "status", args.status);
    insert_opt(&mut params, "comments", args.comments);
    Value::Object(params)
}

fn create_vip_params(args: CreateVipArgs) -> Value {
    let mut params = Map::new();
    params.insert("name".to_string(), json!(args.name));
    params.insert("external_ip".to_string(), json!(args.external_ip));
    params.insert("mapped_ip".to_string(), json!(args.mapped_ip));
    params.insert(
        "external_interface".to_string(),
        json!(args.external_interface),
    );
    insert_opt(&mut params, "port_forward", args.port_forward);
    insert_opt(&mut params, "protocol", args.protocol);
    insert_opt(&mut params, "external_port", args.external_port);
    insert_opt(&mut params, "mapped_port", args.mapped_port);
    insert_opt(&mut params, "comment", args.comment);
    Value::Object(params)
}

fn add_device_params(args: AddDeviceArgs) -> Value {
    let mut params = Map::new();
    params.insert("host".to_string(), json!(args.host));
    if let Some(port) = args.port {
        params.insert("port".to_string(), json!(port));
    }
    insert_opt(&mut params, "api_token", args.api_token);
    insert_opt(&mut params, "username", args.username);
    insert_opt(&mut params, "password", args.password);
    insert_opt(&mut params, "vdom", args.default_vdom);
    if args.verify_tls {
        params.insert("verify_tls".to_string(), json!(true));
    }
    if let Some(timeout) = args.timeout {
        params.insert("timeout".to_string(), json!(timeout));
    }
    Value::Object(params)
}
