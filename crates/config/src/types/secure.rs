//! Plain-or-keyring storage for device secrets.
//!
//! Responsibilities:
//! - Represent a secret that is either inlined in the config file or held
//!   in the OS keyring.
//! - Resolve keyring references at load time (retrieval only).
//!
//! Does NOT handle:
//! - Keyring entry creation or deletion.
//! - Deciding which secrets a device needs (see `device.rs`).
//!
//! Invariants:
//! - All resolved values are `secrecy::SecretString` to prevent accidental
//!   logging.
//! - `KEYRING_SERVICE` is the canonical service name for all keyring reads.

use crate::constants::KEYRING_SERVICE;
use crate::types::secret_string;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// A value that can be stored either in plain text or in the system keyring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SecureValue {
    /// Value stored in the system keyring.
    Keyring {
        /// The account name in the keyring.
        keyring_account: String,
    },
    /// Value stored in plain text (as a SecretString).
    #[serde(with = "secret_string")]
    Plain(SecretString),
}

impl SecureValue {
    /// Resolve the secure value to a SecretString.
    ///
    /// If the value is stored in the keyring, it will be fetched.
    pub fn resolve(&self) -> Result<SecretString, keyring::Error> {
        match self {
            Self::Plain(secret) => Ok(secret.clone()),
            Self::Keyring { keyring_account } => {
                let entry = keyring::Entry::new(KEYRING_SERVICE, keyring_account)?;
                let password = entry.get_password()?;
                Ok(SecretString::new(password.into()))
            }
        }
    }
}
