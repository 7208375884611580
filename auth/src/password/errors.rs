use thiserror::Error;

/// Error type for password operations.
///
/// Verification never fails with an error: a mismatch and an unreadable digest
/// both come back as `false`.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid hashing cost: {0}")]
    InvalidCost(String),
}
