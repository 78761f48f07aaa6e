//! Device connection and command dispatch engine for FortiGate firewalls.
//!
//! The engine maintains a registry of named devices, resolves commands
//! from a closed command set to concrete REST calls, executes them with
//! transparent authentication and bounded retry, and normalizes vendor
//! responses into a stable result envelope.
//!
//! ```no_run
//! use fortigate_client::Dispatcher;
//! use fortigate_config::ConfigLoader;
//! use serde_json::json;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ConfigLoader::new().with_dotenv().load()?;
//! let dispatcher = Dispatcher::from_config(&config)?;
//! let envelope = dispatcher
//!     .dispatch("list_firewall_policies", Some("edge-fw"), json!({}))
//!     .await;
//! println!("{}", serde_json::to_string_pretty(&envelope)?);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod dispatch;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod models;
pub mod normalize;
pub mod registry;
pub mod session;
pub mod transport;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use dispatch::Dispatcher;
pub use envelope::{ErrorDetail, OperationStatus, Payload, ResultEnvelope};
pub use error::{AuthErrorKind, ConnectivityKind, EngineError, Result};
pub use registry::DeviceRegistry;
pub use session::{DeviceHealth, DeviceSession};
