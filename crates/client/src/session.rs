//! Per-device session: transport plus cached auth and runtime state.
//!
//! Responsibilities:
//! - Lazily authenticate and transparently re-authenticate once when a
//!   cached session expires mid-call.
//! - Serialize logins: the auth lock is held across the login exchange so
//!   concurrent callers that find no material perform exactly one login.
//! - Track per-device runtime health (reachability, last contact, last
//!   error) and the set of VDOMs discovered on the device.
//!
//! Invariants:
//! - A caller holding material from generation N cannot clear material
//!   installed by a newer login (see `SessionManager::invalidate`).
//! - The runtime-state lock is a plain mutex and is never held across an
//!   await point.

use crate::auth::{AuthMaterial, AuthStrategy, SessionManager};
use crate::error::{EngineError, Result};
use crate::transport::{ApiResponse, Transport, is_session_expired};
use chrono::{DateTime, Utc};
use fortigate_config::DeviceConfig;
use reqwest::Method;
use serde_json::Value;
use std::sync::Mutex;
use tracing::{debug, info};

/// Snapshot of a device's runtime health.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceHealth {
    pub healthy: bool,
    pub last_contact: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

#[derive(Debug, Default)]
struct RuntimeState {
    healthy: bool,
    last_contact: Option<DateTime<Utc>>,
    last_error: Option<String>,
    discovered_vdoms: Vec<String>,
}

/// A registered device: transport, auth state, and runtime health.
#[derive(Debug)]
pub struct DeviceSession {
    name: String,
    host: String,
    port: u16,
    transport: Transport,
    default_vdom: String,
    auth: tokio::sync::Mutex<SessionManager>,
    state: Mutex<RuntimeState>,
}

impl DeviceSession {
    /// Build a session from device configuration.
    ///
    /// Credentials are resolved here (including keyring lookups); no
    /// network traffic happens until the first call.
    pub fn new(name: impl Into<String>, config: &DeviceConfig) -> Result<Self> {
        let strategy = AuthStrategy::from_credentials(&config.credentials)?;
        let transport = Transport::new(
            &config.host,
            config.port,
            config.verify_tls,
            config.timeout,
        )?;
        Ok(Self {
            name: name.into(),
            host: config.host.clone(),
            port: config.port,
            transport,
            default_vdom: config.vdom.clone(),
            auth: tokio::sync::Mutex::new(SessionManager::new(strategy)),
            state: Mutex::new(RuntimeState::default()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn default_vdom(&self) -> &str {
        &self.default_vdom
    }

    /// Resolve the effective VDOM for a call.
    ///
    /// An override must name the configured default or a VDOM previously
    /// discovered on the device; anything else fails before any network
    /// call is made.
    pub fn effective_vdom(&self, requested: Option<&str>) -> Result<String> {
        match requested {
            None => Ok(self.default_vdom.clone()),
            Some(vdom) if vdom == self.default_vdom => Ok(vdom.to_string()),
            Some(vdom) => {
                let state = self.lock_state();
                if state.discovered_vdoms.iter().any(|v| v == vdom) {
                    Ok(vdom.to_string())
                } else {
                    Err(EngineError::invalid_parameter(
                        "vdom",
                        format!("'{}' is not available on device '{}'", vdom, self.name),
                    ))
                }
            }
        }
    }

    /// Record the device's VDOM inventory from a discovery call.
    pub fn record_vdoms(&self, names: Vec<String>) {
        let mut state = self.lock_state();
        state.discovered_vdoms = names;
    }

    /// Execute an authenticated API call, re-authenticating once if the
    /// cached session has expired.
    ///
    /// A 401/403 that survives the re-login, or any 401/403 under token
    /// auth, is a terminal authentication rejection rather than a remote
    /// API outcome.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        vdom: Option<&str>,
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        let result = self.call_inner(method, path, vdom, body).await;
        self.record_outcome(&result);
        result
    }

    async fn call_inner(
        &self,
        method: Method,
        path: &str,
        vdom: Option<&str>,
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        let (material, generation) = self.acquire_material().await?;
        let response = self
            .transport
            .send(method.clone(), path, vdom, body, &material)
            .await?;
        if !is_session_expired(response.status) {
            return Ok(response);
        }

        if self.is_api_token().await {
            return Err(EngineError::auth_rejected(
                format!("device rejected the API token (HTTP {})", response.status),
                response.status,
            ));
        }

        debug!(device = %self.name, "session expired, re-authenticating");
        let material = self.refresh_material(generation).await?;
        let response = self.transport.send(method, path, vdom, body, &material).await?;
        if is_session_expired(response.status) {
            return Err(EngineError::auth_rejected(
                format!(
                    "device rejected the session after re-authentication (HTTP {})",
                    response.status
                ),
                response.status,
            ));
        }
        Ok(response)
    }

    /// Log out of an active session. No-op for token auth.
    pub async fn shutdown(&self) {
        let mut auth = self.auth.lock().await;
        if auth.is_api_token() {
            return;
        }
        if let Some((material, _)) = auth.current() {
            self.transport.logout(&material).await;
        }
        auth.clear();
    }

    /// Current health snapshot.
    pub fn health(&self) -> DeviceHealth {
        let state = self.lock_state();
        DeviceHealth {
            healthy: state.healthy,
            last_contact: state.last_contact,
            last_error: state.last_error.clone(),
        }
    }

    async fn is_api_token(&self) -> bool {
        self.auth.lock().await.is_api_token()
    }

    /// Get usable auth material, logging in if none is cached.
    ///
    /// The lock is held across the login so concurrent first callers
    /// produce a single login exchange.
    async fn acquire_material(&self) -> Result<(AuthMaterial, u64)> {
        let mut auth = self.auth.lock().await;
        if let Some(current) = auth.current() {
            return Ok(current);
        }
        self.login_locked(&mut auth).await
    }

    /// Invalidate material from `stale_generation` and obtain fresh
    /// material, reusing a login performed by a concurrent caller.
    async fn refresh_material(&self, stale_generation: u64) -> Result<AuthMaterial> {
        let mut auth = self.auth.lock().await;
        auth.invalidate(stale_generation);
        if let Some((material, _)) = auth.current() {
            return Ok(material);
        }
        let (material, _) = self.login_locked(&mut auth).await?;
        Ok(material)
    }

    async fn login_locked(&self, auth: &mut SessionManager) -> Result<(AuthMaterial, u64)> {
        let AuthStrategy::Credentials { username, password } = auth.strategy().clone() else {
            // Token material is installed at construction and never
            // removed, so a missing-material path implies credentials.
            return Err(EngineError::Auth {
                kind: crate::error::AuthErrorKind::CredentialsInvalid,
                message: "no auth material available".to_string(),
                status: None,
            });
        };
        let (cookie, csrf) = self.transport.login(&username, &password).await?;
        auth.set_session(cookie, csrf);
        info!(device = %self.name, "session established");
        auth.current().ok_or_else(|| EngineError::Auth {
            kind: crate::error::AuthErrorKind::CredentialsInvalid,
            message: "login produced no session material".to_string(),
            status: None,
        })
    }

    fn record_outcome(&self, result: &Result<ApiResponse>) {
        let mut state = self.lock_state();
        match result {
            Ok(_) => {
                state.healthy = true;
                state.last_contact = Some(Utc::now());
                state.last_error = None;
            }
            Err(e) => {
                state.healthy = false;
                state.last_error = Some(e.to_string());
            }
        }
    }

    /// Record a dispatch that failed after the HTTP exchange (remote API
    /// errors, normalization failures). The transport result alone would
    /// leave the device looking healthy.
    pub(crate) fn record_failure(&self, err: &EngineError) {
        let mut state = self.lock_state();
        state.healthy = false;
        state.last_error = Some(err.to_string());
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, RuntimeState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fortigate_config::{DeviceConfig, SecureValue};
    use secrecy::SecretString;

    fn session() -> DeviceSession {
        let token = SecureValue::Plain(SecretString::new("token-value".to_string().into()));
        let config = DeviceConfig::with_api_token("192.0.2.1", token);
        DeviceSession::new("fw1", &config).unwrap()
    }

    #[test]
    fn test_default_vdom_used_without_override() {
        let session = session();
        assert_eq!(session.effective_vdom(None).unwrap(), "root");
    }

    #[test]
    fn test_configured_vdom_always_allowed() {
        let session = session();
        assert_eq!(session.effective_vdom(Some("root")).unwrap(), "root");
    }

    #[test]
    fn test_unknown_vdom_rejected_before_discovery() {
        let session = session();
        let err = session.effective_vdom(Some("dmz")).unwrap_err();
        match err {
            EngineError::InvalidParameter { key, reason } => {
                assert_eq!(key, "vdom");
                assert!(reason.contains("dmz"));
            }
            other => panic!("expected InvalidParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_discovered_vdom_allowed_after_recording() {
        let session = session();
        session.record_vdoms(vec!["root".to_string(), "dmz".to_string()]);
        assert_eq!(session.effective_vdom(Some("dmz")).unwrap(), "dmz");
    }

    #[test]
    fn test_initial_health_is_unknown() {
        let session = session();
        let health = session.health();
        assert!(!health.healthy);
        assert!(health.last_contact.is_none());
        assert!(health.last_error.is_none());
    }

    #[test]
    fn test_outcome_recording() {
        let session = session();
        session.record_outcome(&Ok(ApiResponse {
            status: 200,
            body: serde_json::Value::Null,
        }));
        assert!(session.health().healthy);
        assert!(session.health().last_contact.is_some());

        session.record_outcome(&Err(EngineError::Connectivity {
            kind: crate::error::ConnectivityKind::Timeout,
            message: "timed out".to_string(),
        }));
        let health = session.health();
        assert!(!health.healthy);
        assert!(health.last_error.as_deref().is_some_and(|e| e.contains("timed out")));
    }

    #[test]
    fn test_post_exchange_failure_recorded() {
        let session = session();
        // A successful HTTP exchange marks the device healthy first.
        session.record_outcome(&Ok(ApiResponse {
            status: 500,
            body: serde_json::Value::Null,
        }));
        assert!(session.health().healthy);

        session.record_failure(&EngineError::RemoteApi {
            status: 500,
            message: "internal error".to_string(),
        });
        let health = session.health();
        assert!(!health.healthy);
        assert!(health.last_contact.is_some());
        assert!(health.last_error.as_deref().is_some_and(|e| e.contains("500")));
    }
}
