//! Credential resolution and cached auth material.
//!
//! Responsibilities:
//! - Decide the authentication mode for a device (API token vs. session
//!   login) from its configuration.
//! - Cache ready-to-use auth material and guard invalidation with a
//!   generation counter so a stale 401 cannot wipe a fresh login.
//!
//! Does NOT handle:
//! - The login HTTP call itself (see `transport::login`).
//! - Holding the single-flight lock across login (see `session.rs`).
//!
//! Invariants:
//! - An API token is returned without any network call and never expires.
//! - `invalidate` is a no-op unless the caller's generation matches the
//!   current one.

use crate::error::{AuthErrorKind, EngineError, Result};
use fortigate_config::CredentialConfig;
use secrecy::{ExposeSecret, SecretString};

/// Strategy for authenticating with a device.
#[derive(Debug, Clone)]
pub enum AuthStrategy {
    /// Static API token (bearer header, no session management).
    ApiToken { token: SecretString },
    /// Username and password exchanged for a session cookie/CSRF pair.
    Credentials {
        username: String,
        password: SecretString,
    },
}

impl AuthStrategy {
    /// Resolve a strategy from device configuration.
    ///
    /// The token form takes precedence by construction of
    /// [`CredentialConfig`]. Keyring lookups happen here, once, so later
    /// logins never touch the OS keyring.
    pub fn from_credentials(credentials: &CredentialConfig) -> Result<Self> {
        match credentials {
            CredentialConfig::ApiToken { api_token } => {
                let token = api_token.resolve().map_err(|e| EngineError::Auth {
                    kind: AuthErrorKind::CredentialsInvalid,
                    message: format!("failed to resolve API token: {}", e),
                    status: None,
                })?;
                Ok(Self::ApiToken { token })
            }
            CredentialConfig::Password { username, password } => {
                let password = password.resolve().map_err(|e| EngineError::Auth {
                    kind: AuthErrorKind::CredentialsInvalid,
                    message: format!("failed to resolve password: {}", e),
                    status: None,
                })?;
                Ok(Self::Credentials {
                    username: username.clone(),
                    password,
                })
            }
        }
    }
}

/// Ready-to-use auth material for building request headers.
#[derive(Debug, Clone)]
pub enum AuthMaterial {
    /// `Authorization: Bearer <token>`.
    Bearer(SecretString),
    /// Session cookie line plus CSRF token for mutating requests.
    Session {
        cookie: SecretString,
        csrf: SecretString,
    },
}

impl AuthMaterial {
    /// Attach the material to a request.
    pub fn apply(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Self::Bearer(token) => builder.header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", token.expose_secret()),
            ),
            Self::Session { cookie, csrf } => builder
                .header(reqwest::header::COOKIE, cookie.expose_secret())
                .header("X-CSRFTOKEN", csrf.expose_secret()),
        }
    }
}

/// Cached auth material with generation-guarded invalidation.
#[derive(Debug)]
pub struct SessionManager {
    strategy: AuthStrategy,
    material: Option<AuthMaterial>,
    generation: u64,
}

impl SessionManager {
    /// Create a manager for the given strategy.
    ///
    /// For token auth the material is available immediately; session auth
    /// starts uninitialized and logs in on first use.
    pub fn new(strategy: AuthStrategy) -> Self {
        let material = match &strategy {
            AuthStrategy::ApiToken { token } => Some(AuthMaterial::Bearer(token.clone())),
            AuthStrategy::Credentials { .. } => None,
        };
        Self {
            strategy,
            material,
            generation: 0,
        }
    }

    /// The configured strategy.
    pub fn strategy(&self) -> &AuthStrategy {
        &self.strategy
    }

    /// Whether this device uses API token auth (no session lifecycle).
    pub fn is_api_token(&self) -> bool {
        matches!(self.strategy, AuthStrategy::ApiToken { .. })
    }

    /// Current material together with its generation, if any.
    pub fn current(&self) -> Option<(AuthMaterial, u64)> {
        self.material
            .as_ref()
            .map(|m| (m.clone(), self.generation))
    }

    /// Store material obtained from a successful login.
    pub fn set_session(&mut self, cookie: SecretString, csrf: SecretString) {
        self.generation += 1;
        self.material = Some(AuthMaterial::Session { cookie, csrf });
    }

    /// Invalidate the cached material if `generation` is still current.
    ///
    /// A caller holding material from generation N that observes a 401 must
    /// not clear material from generation N+1 installed by a concurrent
    /// re-login. Token auth has nothing to invalidate; the token is static.
    pub fn invalidate(&mut self, generation: u64) {
        if self.is_api_token() {
            return;
        }
        if generation == self.generation {
            self.material = None;
        }
    }

    /// Drop the cached material unconditionally (device removal).
    pub fn clear(&mut self) {
        if !self.is_api_token() {
            self.material = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_manager(token: &str) -> SessionManager {
        SessionManager::new(AuthStrategy::ApiToken {
            token: SecretString::new(token.to_string().into()),
        })
    }

    fn session_manager() -> SessionManager {
        SessionManager::new(AuthStrategy::Credentials {
            username: "admin".to_string(),
            password: SecretString::new("pw".to_string().into()),
        })
    }

    #[test]
    fn test_api_token_available_without_login() {
        let manager = token_manager("tok");
        assert!(manager.is_api_token());
        let (material, generation) = manager.current().unwrap();
        assert_eq!(generation, 0);
        assert!(matches!(material, AuthMaterial::Bearer(_)));
    }

    #[test]
    fn test_session_auth_starts_uninitialized() {
        let manager = session_manager();
        assert!(!manager.is_api_token());
        assert!(manager.current().is_none());
    }

    #[test]
    fn test_set_session_bumps_generation() {
        let mut manager = session_manager();
        manager.set_session(
            SecretString::new("cookie".to_string().into()),
            SecretString::new("csrf".to_string().into()),
        );
        let (_, generation) = manager.current().unwrap();
        assert_eq!(generation, 1);
    }

    #[test]
    fn test_invalidate_requires_matching_generation() {
        let mut manager = session_manager();
        manager.set_session(
            SecretString::new("c1".to_string().into()),
            SecretString::new("t1".to_string().into()),
        );

        // A stale caller (generation 0) must not clear generation 1.
        manager.invalidate(0);
        assert!(manager.current().is_some());

        manager.invalidate(1);
        assert!(manager.current().is_none());
    }

    #[test]
    fn test_invalidate_is_noop_for_api_token() {
        let mut manager = token_manager("tok");
        manager.invalidate(0);
        assert!(manager.current().is_some());
    }

    #[test]
    fn test_debug_does_not_expose_secrets() {
        let mut manager = session_manager();
        manager.set_session(
            SecretString::new("session-cookie-value".to_string().into()),
            SecretString::new("csrf-token-value".to_string().into()),
        );

        let debug_output = format!("{:?}", manager);
        assert!(!debug_output.contains("session-cookie-value"));
        assert!(!debug_output.contains("csrf-token-value"));
        assert!(!debug_output.contains("pw"));
        // Username is not a secret.
        assert!(debug_output.contains("admin"));
    }
}
