use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::auth::models::SessionToken;
use crate::domain::auth::ports::SessionRepository;
use crate::domain::errors::PersistenceError;
use crate::domain::user::models::UserId;
use crate::outbound::repositories::map_sqlx_error;

pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_session(row: &PgRow) -> Result<SessionToken, PersistenceError> {
        Ok(SessionToken {
            id: row.try_get("id").map_err(map_sqlx_error)?,
            user_id: UserId(row.try_get("user_id").map_err(map_sqlx_error)?),
            token: row.try_get("token").map_err(map_sqlx_error)?,
            expires_at: row.try_get("expires_at").map_err(map_sqlx_error)?,
            revoked: row.try_get("revoked").map_err(map_sqlx_error)?,
            created_at: row.try_get("created_at").map_err(map_sqlx_error)?,
        })
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn create(&self, session: SessionToken) -> Result<SessionToken, PersistenceError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (id, user_id, token, expires_at, revoked, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(session.id)
        .bind(session.user_id.0)
        .bind(&session.token)
        .bind(session.expires_at)
        .bind(session.revoked)
        .bind(session.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(session)
    }

    async fn find(&self, token: &str) -> Result<Option<SessionToken>, PersistenceError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, token, expires_at, revoked, created_at
            FROM refresh_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(Self::row_to_session).transpose()
    }

    async fn revoke(&self, token: &str) -> Result<bool, PersistenceError> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked = TRUE WHERE token = $1 AND revoked = FALSE",
        )
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_all(&self, user_id: &UserId) -> Result<u64, PersistenceError> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked = TRUE WHERE user_id = $1 AND revoked = FALSE",
        )
        .bind(user_id.0)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn cleanup_expired(&self) -> Result<u64, PersistenceError> {
        let result =
            sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < NOW() OR revoked = TRUE")
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}
