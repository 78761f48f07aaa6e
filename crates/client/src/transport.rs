//! HTTP transport for a single device.
//!
//! Responsibilities:
//! - Build the per-device `reqwest` client (timeout, TLS verification).
//! - Execute API calls against the `/api/v2` base and perform the session
//!   login/logout exchange.
//! - Classify network-level failures into the engine's connectivity and
//!   auth kinds, and retry transient network failures exactly once with
//!   exponential backoff.
//!
//! Does NOT handle:
//! - Auth material caching or re-login decisions (see `session.rs`).
//! - Interpretation of HTTP status codes; callers receive the status and
//!   the parsed body and decide what a 404 means for their operation.

use crate::auth::AuthMaterial;
use crate::error::{AuthErrorKind, ConnectivityKind, EngineError, Result};
use reqwest::header::SET_COOKIE;
use reqwest::{Method, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Transient network failures are retried this many times after the first
/// attempt.
const MAX_RETRIES: u32 = 1;
/// Base backoff before a retry; doubles per attempt.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Raw response from a device API call.
///
/// Non-2xx statuses are returned here rather than as errors; the caller
/// owns the mapping from status to outcome.
#[derive(Debug)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Best-effort vendor error message from the response body.
    pub fn error_message(&self) -> String {
        for key in ["cli_error", "error_description", "message", "error"] {
            if let Some(text) = self.body.get(key).and_then(Value::as_str) {
                return text.to_string();
            }
        }
        if let Some(code) = self.body.get("error").and_then(Value::as_i64) {
            return format!("device error code {}", code);
        }
        if let Some(text) = self.body.as_str() {
            if !text.trim().is_empty() {
                return text.trim().to_string();
            }
        }
        format!("HTTP status {}", self.status)
    }
}

/// HTTP transport bound to one device's base URL.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    base: Url,
}

impl Transport {
    /// Build a transport for the given device address.
    ///
    /// A bare host gets the `https` scheme and the configured port; a host
    /// carrying an explicit scheme is used as the base URL verbatim.
    /// `verify_tls: false` accepts the self-signed certificates these
    /// appliances ship with.
    pub fn new(host: &str, port: u16, verify_tls: bool, timeout: Duration) -> Result<Self> {
        let address = if host.contains("://") {
            format!("{}/", host.trim_end_matches('/'))
        } else {
            format!("https://{}:{}/", host, port)
        };
        let base = Url::parse(&address)
            .map_err(|e| EngineError::InvalidUrl(format!("{}: {}", address, e)))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(!verify_tls)
            .build()
            .map_err(|e| EngineError::Connectivity {
                kind: ConnectivityKind::ConnectionRefused,
                message: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self { http, base })
    }

    /// Execute an API call under `/api/v2`.
    ///
    /// Transient network failures are retried once with backoff; HTTP
    /// error statuses are returned in the [`ApiResponse`], never retried.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        vdom: Option<&str>,
        body: Option<&Value>,
        material: &AuthMaterial,
    ) -> Result<ApiResponse> {
        let url = self.api_url(path)?;
        let mut attempt = 0;
        loop {
            let mut builder = self.http.request(method.clone(), url.clone());
            if let Some(vdom) = vdom {
                builder = builder.query(&[("vdom", vdom)]);
            }
            if let Some(body) = body {
                builder = builder.json(body);
            }
            builder = material.apply(builder);

            match builder.send().await {
                Ok(response) => return read_response(response).await,
                Err(e) => {
                    let err = classify_network_error(&e);
                    if attempt < MAX_RETRIES && err.is_retryable() {
                        let delay = RETRY_BASE_DELAY * 2u32.pow(attempt);
                        warn!(
                            path,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            "network failure, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(err);
                }
            }
        }
    }

    /// Exchange credentials for session auth material.
    ///
    /// Success is determined solely by the presence of a `ccsrftoken`
    /// cookie in the response; the login endpoint returns 200 even on
    /// rejected credentials.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<(SecretString, SecretString)> {
        let url = self
            .base
            .join("logincheck")
            .map_err(|e| EngineError::InvalidUrl(e.to_string()))?;
        debug!(%username, "performing session login");

        let response = self
            .http
            .post(url)
            .form(&[("username", username), ("secretkey", password.expose_secret())])
            .send()
            .await
            .map_err(|e| login_network_error(&e))?;

        let mut cookie_pairs = Vec::new();
        let mut csrf = None;
        for header in response.headers().get_all(SET_COOKIE) {
            let Ok(text) = header.to_str() else { continue };
            let Some(pair) = text.split(';').next() else {
                continue;
            };
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            if name.trim() == "ccsrftoken" {
                csrf = Some(value.trim().trim_matches('"').to_string());
            }
            cookie_pairs.push(pair.trim().to_string());
        }

        match csrf {
            Some(csrf) if !csrf.is_empty() && csrf != "0%260" => {
                let cookie = cookie_pairs.join("; ");
                Ok((
                    SecretString::new(cookie.into()),
                    SecretString::new(csrf.into()),
                ))
            }
            _ => Err(EngineError::Auth {
                kind: AuthErrorKind::CredentialsInvalid,
                message: "login rejected: no session token issued".to_string(),
                status: None,
            }),
        }
    }

    /// Terminate a session. Failures are logged and swallowed; logout is
    /// best-effort cleanup.
    pub async fn logout(&self, material: &AuthMaterial) {
        let Ok(url) = self.base.join("logout") else {
            return;
        };
        let builder = material.apply(self.http.post(url));
        if let Err(e) = builder.send().await {
            debug!(error = %e, "logout request failed");
        }
    }

    fn api_url(&self, path: &str) -> Result<Url> {
        self.base
            .join(&format!("api/v2/{}", path))
            .map_err(|e| EngineError::InvalidUrl(format!("{}: {}", path, e)))
    }
}

async fn read_response(response: reqwest::Response) -> Result<ApiResponse> {
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| classify_network_error(&e))?;
    let body = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };
    Ok(ApiResponse { status, body })
}

/// Map a `reqwest` failure to a connectivity or auth error kind.
fn classify_network_error(e: &reqwest::Error) -> EngineError {
    if e.is_timeout() {
        return EngineError::Connectivity {
            kind: ConnectivityKind::Timeout,
            message: e.to_string(),
        };
    }
    if is_tls_error(e) {
        return EngineError::Auth {
            kind: AuthErrorKind::TlsFailure,
            message: e.to_string(),
            status: None,
        };
    }
    EngineError::Connectivity {
        kind: ConnectivityKind::ConnectionRefused,
        message: e.to_string(),
    }
}

/// Login-time network failures are authentication failures from the
/// caller's perspective.
fn login_network_error(e: &reqwest::Error) -> EngineError {
    if is_tls_error(e) {
        return EngineError::Auth {
            kind: AuthErrorKind::TlsFailure,
            message: e.to_string(),
            status: None,
        };
    }
    EngineError::Auth {
        kind: AuthErrorKind::Unreachable,
        message: e.to_string(),
        status: None,
    }
}

fn is_tls_error(e: &reqwest::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(e);
    while let Some(err) = source {
        let text = err.to_string().to_lowercase();
        if text.contains("certificate") || text.contains("tls") || text.contains("ssl") {
            return true;
        }
        source = err.source();
    }
    false
}

/// HTTP statuses that indicate the cached session expired.
pub fn is_session_expired(status: u16) -> bool {
    status == StatusCode::UNAUTHORIZED.as_u16() || status == StatusCode::FORBIDDEN.as_u16()
}
