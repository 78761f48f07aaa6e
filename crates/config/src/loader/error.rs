//! Loader error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading the device inventory.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No config path was provided and the environment fallback is unset.
    #[error(
        "configuration path must be provided either as an argument or via the {0} environment variable"
    )]
    MissingPath(String),

    /// The configuration file does not exist or could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON.
    #[error("invalid JSON in configuration file: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The JSON parsed but the structure is wrong (missing sections,
    /// missing required device fields, duplicate identifiers).
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// A keyring-backed secret could not be resolved.
    #[error("failed to resolve secret for device '{device}': {source}")]
    Keyring {
        device: String,
        #[source]
        source: keyring::Error,
    },
}
