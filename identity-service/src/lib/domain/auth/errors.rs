use thiserror::Error;

use crate::domain::errors::PersistenceError;

/// Error for every credential lifecycle operation.
///
/// All variants except `PersistenceUnavailable` and `Internal` are typed,
/// caller-recoverable outcomes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Email already registered: {0}")]
    AlreadyExists(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is not active")]
    AccountNotActive,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token not found")]
    TokenNotFound,

    #[error("Token has been revoked")]
    TokenRevoked,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token has already been used")]
    TokenAlreadyUsed,

    #[error("User not found")]
    UserNotFound,

    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error for reset notification delivery
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    #[error("Failed to serialize notification: {0}")]
    SerializationFailed(String),

    #[error("Failed to publish notification to broker: {0}")]
    PublishFailed(String),
}

/// Attach a description of the failed step to a persistence error.
pub trait PersistenceContext<T> {
    fn context(self, what: &str) -> Result<T, AuthError>;
}

impl<T> PersistenceContext<T> for Result<T, PersistenceError> {
    fn context(self, what: &str) -> Result<T, AuthError> {
        self.map_err(|err| match err {
            PersistenceError::Unavailable(msg) => {
                AuthError::PersistenceUnavailable(format!("{}: {}", what, msg))
            }
            other => AuthError::Internal(format!("{}: {}", what, other)),
        })
    }
}
