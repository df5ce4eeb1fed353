//! HMAC-SHA512 request signing
//!
//! Indodax signature algorithm:
//! 1. Serialize the payload as `key1=value1&key2=value2` in insertion order,
//!    without URL-encoding
//! 2. HMAC-SHA512(secret, serialized payload)
//! 3. Lowercase hex encode the digest
//!
//! The server recomputes the same string from the form body it receives and
//! rejects any mismatch.

use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha512;
use tracing::debug;

use crate::credentials::Credentials;
use crate::error::AuthResult;
use crate::payload::Payload;

type HmacSha512 = Hmac<Sha512>;

/// Signs private payloads with the credential secret
#[derive(Debug, Clone)]
pub struct Signer<'a> {
    credentials: &'a Credentials,
    debug: bool,
}

impl<'a> Signer<'a> {
    /// Create a signer for the given credentials
    pub fn new(credentials: &'a Credentials) -> Self {
        Self {
            credentials,
            debug: false,
        }
    }

    /// Emit debug traces of the payload, its serialized form and the signature
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Get the API key that accompanies signatures from this signer
    pub fn api_key(&self) -> &str {
        self.credentials.api_key()
    }

    /// Sign a payload
    ///
    /// # Returns
    /// 128-character lowercase hex HMAC-SHA512 digest
    pub fn sign(&self, payload: &Payload) -> String {
        if self.debug {
            debug!(?payload, "signing payload");
        }

        let serialized = payload.to_query_string();
        if self.debug {
            debug!(%serialized, "serialized payload");
        }

        let signature = self.sign_str(&serialized);
        if self.debug {
            debug!(%signature, "payload signature");
        }

        signature
    }

    /// Sign a dynamic JSON payload
    ///
    /// Fails with `InvalidArgument` when `payload` is `null` or not an object.
    pub fn sign_value(&self, payload: &Value) -> AuthResult<String> {
        let payload = Payload::try_from(payload.clone())?;
        Ok(self.sign(&payload))
    }

    fn sign_str(&self, message: &str) -> String {
        let mut mac = HmacSha512::new_from_slice(self.credentials.secret_bytes())
            .expect("HMAC can take key of any size");
        mac.update(message.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}
