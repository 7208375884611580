pub mod memory;
pub mod reset;
pub mod session;
pub mod user;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::errors::PersistenceError;
use crate::domain::health::DatabaseHealth;

pub use memory::InMemoryStore;
pub use reset::PostgresResetRepository;
pub use session::PostgresSessionRepository;
pub use user::PostgresUserRepository;

/// Translate a sqlx failure into the domain persistence error.
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> PersistenceError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            return PersistenceError::Duplicate(
                db_err.constraint().unwrap_or("unique constraint").to_string(),
            );
        }
    }

    match err {
        sqlx::Error::RowNotFound => PersistenceError::NotFound(err.to_string()),
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::Decode(_) => PersistenceError::InvalidRecord(err.to_string()),
        other => PersistenceError::Unavailable(other.to_string()),
    }
}

/// Database connectivity check backed by the connection pool.
pub struct PostgresHealth {
    pool: PgPool,
}

impl PostgresHealth {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatabaseHealth for PostgresHealth {
    async fn ping(&self) -> Result<(), PersistenceError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(map_sqlx_error)
    }
}
