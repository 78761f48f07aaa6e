//! Shared helpers for integration tests.
//!
//! Not every test binary uses every helper.
#![allow(dead_code)]

use fortigate_client::Dispatcher;
use fortigate_config::{DeviceConfig, SecureValue};
use secrecy::SecretString;
use serde_json::Value;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn plain(value: &str) -> SecureValue {
    SecureValue::Plain(SecretString::new(value.to_string().into()))
}

/// Device config pointing at a mock server, using API token auth.
pub fn token_device(server: &MockServer) -> DeviceConfig {
    DeviceConfig::with_api_token(server.uri(), plain("test-token"))
}

/// Device config pointing at a mock server, using session auth.
pub fn password_device(server: &MockServer) -> DeviceConfig {
    DeviceConfig::with_password(server.uri(), "admin", plain("hunter2"))
}

/// Dispatcher with a single registered device named `fw1`.
pub fn dispatcher_with(config: &DeviceConfig) -> Dispatcher {
    let registry = Arc::new(fortigate_client::DeviceRegistry::new());
    registry.add("fw1", config).expect("device registration");
    Dispatcher::new(registry)
}

/// Mount a login mock that issues a session cookie.
pub async fn mount_login(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/logincheck"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("set-cookie", "ccsrftoken=\"csrf-abc123\"; path=/; secure")
                .append_header(
                    "set-cookie",
                    "APSCOOKIE_1234=\"Era%3D1\"; path=/; secure; httponly",
                ),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Mount a login mock that returns 200 without issuing a session token,
/// which is how rejected credentials look on the wire.
pub async fn mount_login_rejected(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/logincheck"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

pub fn json_response(status: u16, body: Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(body)
}
