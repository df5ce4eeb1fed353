//! Common test utilities and fixtures for integration tests
//!
//! Response bodies mirror what the Indodax API returns.

#![allow(dead_code)]

use indodax_auth::{Credentials, Payload, Signer};
use indodax_rest::{ClientConfig, IndodaxClient};
use wiremock::{MockServer, Request};

pub const API_KEY: &str = "TEST-API-KEY";
pub const API_SECRET: &str = "test-api-secret";

/// Sample ticker body
pub const TICKER_BODY: &str = r#"{
    "ticker": {
        "high": "1030000000",
        "low": "1001000000",
        "vol_btc": "36.94418466",
        "vol_idr": "37641453226",
        "last": "1018000000",
        "buy": "1017999000",
        "sell": "1018000000",
        "server_time": 1716280000
    }
}"#;

/// Sample invalid nonce rejection
pub fn invalid_nonce_body(expected: &str) -> serde_json::Value {
    serde_json::json!({
        "success": 0,
        "error": format!("Nonce must be greater than {}. You have to send a bigger nonce.", expected),
        "error_code": "invalid_nonce"
    })
}

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client with test credentials pointed at the mock server
pub fn authed_client(server: &MockServer) -> IndodaxClient {
    IndodaxClient::with_config(
        ClientConfig::new()
            .with_credentials(Credentials::new(API_KEY, API_SECRET))
            .with_public_url(format!("{}/api", server.uri()))
            .with_private_url(format!("{}/tapi", server.uri())),
    )
    .expect("client should build")
}

/// Client without credentials pointed at the mock server
pub fn public_client(server: &MockServer) -> IndodaxClient {
    IndodaxClient::with_config(ClientConfig::new().with_public_url(format!("{}/api", server.uri())))
        .expect("client should build")
}

/// Decode the form body of a captured request, keeping field order
pub fn form_fields(request: &Request) -> Vec<(String, String)> {
    serde_urlencoded::from_bytes(&request.body).expect("form encoded body")
}

/// Nonce sent with a captured private request
pub fn sent_nonce(request: &Request) -> u64 {
    form_fields(request)
        .into_iter()
        .find(|(k, _)| k == "nonce")
        .and_then(|(_, v)| v.parse().ok())
        .expect("nonce field")
}

/// Signature the server would compute for a captured request
pub fn expected_signature(request: &Request) -> String {
    let payload: Payload = form_fields(request).into_iter().collect();
    let credentials = Credentials::new(API_KEY, API_SECRET);
    Signer::new(&credentials).sign(&payload)
}

/// Header value of a captured request
pub fn header(request: &Request, name: &str) -> String {
    request
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
