//! Normalized record types.
//!
//! Vendor payloads are permissive JSON; these types define the stable
//! field vocabulary callers see. Each record parses from a vendor object
//! with `from_vendor` and serializes with snake_case engine field names.

mod common;
mod firewall;
mod interface;
mod network;
mod routing;
mod system;
mod virtual_ip;

pub use common::{id_number, member_names, text};
pub use firewall::PolicyRecord;
pub use interface::InterfaceRecord;
pub use network::{AddressRecord, ServiceRecord};
pub use routing::{RouteRecord, RouteTableEntry};
pub use system::{SystemStatusRecord, VdomRecord};
pub use virtual_ip::VirtualIpRecord;
