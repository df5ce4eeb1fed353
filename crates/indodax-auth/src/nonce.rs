//! Nonce tracking for private calls
//!
//! The server rejects any private request whose nonce is not strictly greater
//! than the last one it accepted for the same API key. The tracker keeps the
//! next lower bound in memory and advances it on every generated nonce.
//!
//! Nonce generation follows the exchange's accepted scheme:
//!
//! ```text
//! nonce  = latest + now_epoch_millis
//! latest = nonce + 1
//! ```
//!
//! The state lives only in memory and starts at zero (or a seed). Persist
//! [`NonceTracker::get`] across restarts and restore it with
//! [`NonceTracker::set`] if nonces must survive the process.

use parking_lot::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

use crate::error::{AuthError, AuthResult};

/// Shape of the `invalid_nonce` error message that recovery understands
///
/// The message is split on single spaces; token index 5 holds the minimum
/// acceptable nonce, possibly followed by a sentence-ending `.`:
///
/// ```text
/// Nonce must be greater than 1578046744587. You sent 12
/// 0     1    2  3       4    5
/// ```
pub const INVALID_NONCE_MESSAGE_V1: &str = "Nonce must be greater than <nonce>. ...";

/// Index of the nonce token in an `invalid_nonce` message
const EXPECTED_NONCE_TOKEN: usize = 5;

/// Mutex-guarded nonce state
///
/// All read-modify-write steps happen under a single lock, so clones of an
/// `Arc<NonceTracker>` never hand out the same nonce twice.
#[derive(Debug, Default)]
pub struct NonceTracker {
    latest: Mutex<u64>,
}

impl NonceTracker {
    /// Create a tracker starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracker starting at a previously persisted value
    pub fn with_seed(latest: u64) -> Self {
        Self {
            latest: Mutex::new(latest),
        }
    }

    /// Produce the nonce for the next private call
    pub fn next_nonce(&self) -> u64 {
        self.next_nonce_at(now_millis())
    }

    /// Produce the next nonce against an explicit clock reading
    pub fn next_nonce_at(&self, now_millis: u64) -> u64 {
        let mut latest = self.latest.lock();
        let nonce = latest.saturating_add(now_millis);
        *latest = nonce.saturating_add(1);
        nonce
    }

    /// Current lower bound, without advancing it
    pub fn get(&self) -> u64 {
        *self.latest.lock()
    }

    /// Override the stored lower bound
    pub fn set(&self, nonce: u64) {
        *self.latest.lock() = nonce;
    }

    /// Override the stored lower bound from its decimal representation
    ///
    /// Fails with `InvalidArgument` when `nonce` is not a non-negative integer.
    pub fn set_str(&self, nonce: &str) -> AuthResult<()> {
        let parsed = nonce.trim().parse::<u64>().map_err(|_| {
            AuthError::InvalidArgument(format!("nonce `{}` must be a number", nonce))
        })?;
        self.set(parsed);
        Ok(())
    }

    /// Apply the server's `invalid_nonce` hint
    ///
    /// Replaces the stored value with the nonce parsed from `message`.
    /// Messages that do not match [`INVALID_NONCE_MESSAGE_V1`] leave the state
    /// untouched.
    ///
    /// # Returns
    /// The new stored value, or `None` if recovery was skipped
    pub fn recover(&self, message: &str) -> Option<u64> {
        match parse_expected_nonce(message) {
            Some(expected) => {
                self.set(expected);
                debug!(nonce = expected, "nonce recovered from server hint");
                Some(expected)
            }
            None => {
                warn!(%message, "invalid_nonce message has unexpected shape, skipping nonce recovery");
                None
            }
        }
    }
}

/// Extract the minimum acceptable nonce from an `invalid_nonce` message
///
/// Takes the sixth space-separated token, removes its first `.` and parses
/// the leading decimal digits. See [`INVALID_NONCE_MESSAGE_V1`].
pub fn parse_expected_nonce(message: &str) -> Option<u64> {
    let token = message.split(' ').nth(EXPECTED_NONCE_TOKEN)?;
    let token = token.replacen('.', "", 1);

    let digits: String = token.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    digits.parse().ok()
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
