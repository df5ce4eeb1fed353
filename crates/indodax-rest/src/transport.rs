//! HTTP transport for public and private calls
//!
//! Public calls are unsigned `POST {public_url}/{path}` requests whose JSON
//! body is returned as-is. Private calls go to the single `tapi` endpoint with
//! a nonce, a `Key` header and a `Sign` header, and are classified by the
//! `success` flag of the response envelope.

use indodax_auth::{Credentials, NonceTracker, Payload, Signer};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

use crate::client::ClientConfig;
use crate::error::{ApiErrorCode, RestError, RestResult};
use crate::types::{PrivateRequest, PrivateResponse};

/// Shared HTTP transport
///
/// Private calls are serialized: one call holds the gate from nonce
/// assignment until its response has been classified, so nonces reach the
/// server in the order they were generated and invalid-nonce recovery lands
/// before the next nonce is drawn.
#[derive(Debug)]
pub struct Transport {
    http_client: Client,
    public_url: Url,
    private_url: Url,
    credentials: Option<Credentials>,
    nonces: Arc<NonceTracker>,
    private_gate: Mutex<()>,
    debug: bool,
}

impl Transport {
    /// Build a transport from client configuration
    pub fn new(config: ClientConfig) -> RestResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_deref().unwrap_or("indodax-rest/0.1.0"))
            .build()?;

        Ok(Self {
            http_client,
            public_url: Url::parse(&config.public_url)?,
            private_url: Url::parse(&config.private_url)?,
            credentials: config.credentials,
            nonces: config.nonce_tracker,
            private_gate: Mutex::new(()),
            debug: config.debug,
        })
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn nonces(&self) -> &Arc<NonceTracker> {
        &self.nonces
    }

    pub fn is_debugging(&self) -> bool {
        self.debug
    }

    /// Resolve a public resource path against the public base URL
    pub fn public_endpoint(&self, path: &str) -> RestResult<Url> {
        let base = self.public_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}/{}", base, path.trim_start_matches('/')))?)
    }

    /// Unauthenticated request returning the parsed body unchanged
    pub async fn public(&self, path: &str) -> RestResult<Value> {
        let url = self.public_endpoint(path)?;
        debug!(%url, "public request");

        let body = self.http_client.post(url).send().await?.text().await?;

        parse_body(body).map_err(|e| {
            warn!(error = %e, path, "public response is not JSON");
            e
        })
    }

    /// Signed request for a typed private call
    pub async fn private_request<R: PrivateRequest>(&self, request: &R) -> RestResult<Value> {
        self.private(request.to_payload()).await
    }

    /// Signed request for an arbitrary payload
    ///
    /// A nonce already present in `payload` is sent as-is and leaves the
    /// tracker untouched; otherwise the tracker supplies one.
    ///
    /// The body is sent `application/x-www-form-urlencoded` while the
    /// signature covers the raw `key=value&...` string. The server decodes
    /// the form before recomputing the HMAC, so values containing spaces,
    /// `&` or `=` (free-text `client_order_id`, raw payloads) still verify.
    ///
    /// # Returns
    /// The `return` field of a successful response
    pub async fn private(&self, mut payload: Payload) -> RestResult<Value> {
        let credentials = self.credentials.as_ref().ok_or(RestError::AuthRequired)?;

        let _gate = self.private_gate.lock().await;

        if !payload.has_nonce() {
            payload.insert("nonce", self.nonces.next_nonce());
        }

        if self.debug {
            debug!(?payload, "private request");
        }

        let signature = Signer::new(credentials).with_debug(self.debug).sign(&payload);
        let form = serde_urlencoded::to_string(&payload)
            .map_err(|e| RestError::InvalidArgument(e.to_string()))?;

        debug!(method = payload.method().unwrap_or_default(), "making authenticated request");

        let body = self
            .http_client
            .post(self.private_url.clone())
            .header("Key", credentials.api_key())
            .header("Sign", signature)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(form)
            .send()
            .await?
            .text()
            .await?;

        let response = PrivateResponse::from_value(parse_body(body)?);

        match response.into_result() {
            Ok(result) => Ok(result),
            Err((code, message)) => {
                warn!(%code, %message, method = payload.method().unwrap_or_default(), "private call rejected");

                if code == ApiErrorCode::InvalidNonce {
                    self.nonces.recover(&message);
                }

                Err(RestError::Api { code, message })
            }
        }
    }
}

fn parse_body(body: String) -> RestResult<Value> {
    serde_json::from_str(&body).map_err(|source| RestError::MalformedResponse { source, body })
}
