use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::auth::models::PasswordRedemption;
use crate::domain::auth::models::RedemptionOutcome;
use crate::domain::auth::models::ResetToken;
use crate::domain::auth::ports::ResetRepository;
use crate::domain::errors::PersistenceError;
use crate::domain::user::models::EmailAddress;
use crate::outbound::repositories::map_sqlx_error;

pub struct PostgresResetRepository {
    pool: PgPool,
}

impl PostgresResetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_reset(row: &PgRow) -> Result<ResetToken, PersistenceError> {
        Ok(ResetToken {
            id: row.try_get("id").map_err(map_sqlx_error)?,
            email: EmailAddress::new(row.try_get("email").map_err(map_sqlx_error)?)
                .map_err(|e| PersistenceError::InvalidRecord(e.to_string()))?,
            token: row.try_get("token").map_err(map_sqlx_error)?,
            expires_at: row.try_get("expires_at").map_err(map_sqlx_error)?,
            used: row.try_get("used").map_err(map_sqlx_error)?,
            created_at: row.try_get("created_at").map_err(map_sqlx_error)?,
        })
    }
}

#[async_trait]
impl ResetRepository for PostgresResetRepository {
    async fn create(&self, reset: ResetToken) -> Result<ResetToken, PersistenceError> {
        sqlx::query(
            r#"
            INSERT INTO password_resets (id, email, token, expires_at, used, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(reset.id)
        .bind(reset.email.as_str())
        .bind(&reset.token)
        .bind(reset.expires_at)
        .bind(reset.used)
        .bind(reset.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(reset)
    }

    async fn find(&self, token: &str) -> Result<Option<ResetToken>, PersistenceError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, token, expires_at, used, created_at
            FROM password_resets
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(Self::row_to_reset).transpose()
    }

    async fn mark_used(&self, token: &str) -> Result<bool, PersistenceError> {
        let result =
            sqlx::query("UPDATE password_resets SET used = TRUE WHERE token = $1 AND used = FALSE")
                .bind(token)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn redeem(
        &self,
        redemption: &PasswordRedemption,
    ) -> Result<RedemptionOutcome, PersistenceError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let marked =
            sqlx::query("UPDATE password_resets SET used = TRUE WHERE token = $1 AND used = FALSE")
                .bind(&redemption.token)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;

        if marked.rows_affected() == 0 {
            tx.rollback().await.map_err(map_sqlx_error)?;
            return Ok(RedemptionOutcome::AlreadyUsed);
        }

        let updated =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(redemption.user_id.0)
                .bind(&redemption.password_hash)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;

        if updated.rows_affected() == 0 {
            tx.rollback().await.map_err(map_sqlx_error)?;
            return Err(PersistenceError::NotFound(format!(
                "user {}",
                redemption.user_id
            )));
        }

        let revoked = sqlx::query(
            "UPDATE refresh_tokens SET revoked = TRUE WHERE user_id = $1 AND revoked = FALSE",
        )
        .bind(redemption.user_id.0)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(RedemptionOutcome::Redeemed {
            revoked_sessions: revoked.rows_affected(),
        })
    }

    async fn cleanup_expired(&self) -> Result<u64, PersistenceError> {
        let result =
            sqlx::query("DELETE FROM password_resets WHERE expires_at < NOW() OR used = TRUE")
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}
