use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token is not valid yet")]
    TokenNotYetValid,

    #[error("Token signing algorithm is not accepted")]
    InvalidAlgorithm,

    #[error("Token is invalid: {0}")]
    InvalidToken(String),
}
