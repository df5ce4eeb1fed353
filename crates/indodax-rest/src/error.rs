//! Error types for REST API operations

use indodax_auth::AuthError;

/// `error_code` value the server uses for a stale nonce
pub const INVALID_NONCE_CODE: &str = "invalid_nonce";

/// Application-level error code reported by the private API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorCode {
    /// Nonce was not greater than the last accepted one
    InvalidNonce,
    /// Any other `error_code` value
    Other(String),
    /// Response carried no `error_code`
    Unknown,
}

impl ApiErrorCode {
    /// Parse the `error_code` field of a failed response
    pub fn parse(code: Option<&str>) -> Self {
        match code {
            Some(INVALID_NONCE_CODE) => Self::InvalidNonce,
            Some(other) => Self::Other(other.to_string()),
            None => Self::Unknown,
        }
    }

    /// Get the wire representation, if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::InvalidNonce => Some(INVALID_NONCE_CODE),
            Self::Other(code) => Some(code),
            Self::Unknown => None,
        }
    }
}

impl std::fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str().unwrap_or("unknown"))
    }
}

/// Errors that can occur during REST API operations
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// Malformed input to the signer or nonce tracker
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// HTTP request failed before a response body was read
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body is not valid JSON
    #[error("Malformed response: {source}")]
    MalformedResponse {
        #[source]
        source: serde_json::Error,
        /// Raw response body
        body: String,
    },

    /// Private API reported `success != 1`
    #[error("API error ({code}): {message}")]
    Api {
        /// Parsed `error_code`
        code: ApiErrorCode,
        /// Human-readable `error` message
        message: String,
    },

    /// Missing API credentials for private endpoint
    #[error("Authentication required for this endpoint")]
    AuthRequired,

    /// Endpoint URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),
}

impl From<AuthError> for RestError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidArgument(msg) => Self::InvalidArgument(msg),
            AuthError::EnvVarNotSet(var) => Self::EnvVarNotSet(var),
        }
    }
}

impl RestError {
    /// Check if the server rejected the nonce
    ///
    /// The tracker has already been corrected when this is returned, so the
    /// next call uses an acceptable nonce.
    pub fn is_invalid_nonce(&self) -> bool {
        matches!(
            self,
            Self::Api {
                code: ApiErrorCode::InvalidNonce,
                ..
            }
        )
    }

    /// Check if repeating the call may succeed
    ///
    /// The client never retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { code, .. } => *code == ApiErrorCode::InvalidNonce,
            Self::InvalidArgument(_)
            | Self::MalformedResponse { .. }
            | Self::AuthRequired
            | Self::InvalidUrl(_)
            | Self::EnvVarNotSet(_) => false,
        }
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;
