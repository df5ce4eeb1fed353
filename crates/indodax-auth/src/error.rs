//! Error types for signing and nonce operations

/// Errors that can occur while preparing an authenticated request
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Malformed input to the signer or the nonce tracker
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
