//! fortigate-cli - command-line interface for FortiGate administration.
//!
//! Responsibilities:
//! - Parse arguments, load the device inventory, and run exactly one
//!   engine dispatch.
//! - Render the result envelope (JSON or table) and translate the error
//!   kind into a structured exit code.
//!
//! Does NOT handle:
//! - Endpoint knowledge or normalization (see `crates/client`).
//!
//! Invariants:
//! - `.env` is loaded BEFORE CLI parsing so clap env defaults can read it.

mod args;
mod error;
mod formatters;

use args::Cli;
use clap::Parser;
use error::ExitCode;
use fortigate_client::Dispatcher;
use fortigate_config::ConfigLoader;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = ConfigLoader::new().load_dotenv() {
        eprintln!("Failed to load environment: {}", e);
        std::process::exit(ExitCode::GeneralError.as_i32());
    }

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let loader = match &cli.config {
        Some(path) => ConfigLoader::new().with_path(path),
        None => ConfigLoader::new(),
    };
    let config = match loader.load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    };

    let dispatcher = match Dispatcher::from_config(&config) {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            eprintln!("Failed to initialize devices: {}", e);
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    };

    let invocation = match cli.command.into_invocation() {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(ExitCode::ValidationError.as_i32());
        }
    };

    let device = cli.device.as_deref();
    if invocation.device_scoped && device.is_none() {
        eprintln!("error: a target device is required (use --device)");
        std::process::exit(ExitCode::ValidationError.as_i32());
    }

    let mut params = invocation.params;
    if let (Some(vdom), Some(obj)) = (&cli.vdom, params.as_object_mut()) {
        obj.insert("vdom".to_string(), serde_json::json!(vdom));
    }

    let envelope = dispatcher.dispatch(invocation.command, device, params).await;
    println!("{}", formatters::render(&envelope, cli.output));
    std::process::exit(ExitCode::from_envelope(&envelope).as_i32());
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
