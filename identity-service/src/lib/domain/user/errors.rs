use thiserror::Error;

use crate::domain::errors::PersistenceError;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for DisplayName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DisplayNameError {
    #[error("Display name too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Display name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for plaintext password policy violations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password too short: minimum {min} characters")]
    TooShort { min: usize },

    #[error("Password too long: maximum {max} characters")]
    TooLong { max: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("Unknown role: {0}")]
    Unknown(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountStatusError {
    #[error("Unknown account status: {0}")]
    Unknown(String),
}

/// Error for pagination parameters
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("Page must be at least 1, got {0}")]
    InvalidPage(u32),

    #[error("Limit must be between 1 and {max}, got {actual}")]
    InvalidLimit { max: u32, actual: u32 },
}

/// Top-level error for user management operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid display name: {0}")]
    InvalidDisplayName(#[from] DisplayNameError),

    #[error("Invalid new password: {0}")]
    WeakPassword(#[from] PasswordPolicyError),

    #[error("Invalid role: {0}")]
    InvalidRole(#[from] RoleError),

    #[error("Invalid status: {0}")]
    InvalidStatus(#[from] AccountStatusError),

    #[error("Invalid pagination: {0}")]
    InvalidPage(#[from] PageError),

    // Domain-level errors
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Invalid old password")]
    InvalidPassword,

    // Infrastructure errors
    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PersistenceError> for UserError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound(what) => UserError::NotFound(what),
            PersistenceError::Unavailable(msg) => UserError::PersistenceUnavailable(msg),
            other => UserError::Internal(other.to_string()),
        }
    }
}
