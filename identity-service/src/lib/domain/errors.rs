use thiserror::Error;

/// Failure reported by a repository implementation.
///
/// Shared by every persistence port so that services can tell a constraint
/// violation apart from an unreachable store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PersistenceError {
    #[error("Duplicate record violates constraint {0}")]
    Duplicate(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Stored record is invalid: {0}")]
    InvalidRecord(String),

    #[error("Persistence unavailable: {0}")]
    Unavailable(String),
}
