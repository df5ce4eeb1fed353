//! Request signing and nonce tracking for the Indodax private API
//!
//! Every private (`/tapi`) call carries two headers: the API key and an
//! HMAC-SHA512 signature over the form payload. The payload must also carry a
//! nonce that is strictly greater than every nonce the server has already
//! accepted for the same key.
//!
//! This crate provides the pieces that make those requests acceptable:
//!
//! - [`Credentials`] - API key and secret (secret zeroized on drop)
//! - [`Payload`] - insertion-ordered form payload
//! - [`Signer`] - deterministic `key=value&...` HMAC-SHA512 hex signatures
//! - [`NonceTracker`] - mutex-guarded nonce state with invalid-nonce recovery
//!
//! # Example
//!
//! ```
//! use indodax_auth::{Credentials, NonceTracker, Payload, Signer};
//!
//! let creds = Credentials::new("my-key", "my-secret");
//! let signer = Signer::new(&creds);
//! let nonces = NonceTracker::new();
//!
//! let mut payload = Payload::with_method("getInfo");
//! payload.insert("nonce", nonces.next_nonce());
//!
//! let signature = signer.sign(&payload);
//! assert_eq!(signature.len(), 128);
//! ```

mod credentials;
mod error;
pub mod nonce;
mod payload;
mod signer;

pub use credentials::{Credentials, API_KEY_ENV, API_SECRET_ENV};
pub use error::{AuthError, AuthResult};
pub use nonce::{parse_expected_nonce, NonceTracker, INVALID_NONCE_MESSAGE_V1};
pub use payload::Payload;
pub use signer::Signer;
