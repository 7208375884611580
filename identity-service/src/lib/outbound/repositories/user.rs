use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::QueryBuilder;
use sqlx::Row;

use crate::domain::errors::PersistenceError;
use crate::domain::user::models::DisplayName;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::PageRequest;
use crate::domain::user::models::User;
use crate::domain::user::models::UserFilter;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::outbound::repositories::map_sqlx_error;
use crate::user::errors::AccountStatusError;
use crate::user::errors::RoleError;

const USER_COLUMNS: &str =
    "id, email, password_hash, display_name, role, status, created_at, updated_at";

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &PgRow) -> Result<User, PersistenceError> {
        let invalid = |e: String| PersistenceError::InvalidRecord(e);

        let role: String = row.try_get("role").map_err(map_sqlx_error)?;
        let status: String = row.try_get("status").map_err(map_sqlx_error)?;

        Ok(User {
            id: UserId(row.try_get("id").map_err(map_sqlx_error)?),
            email: EmailAddress::new(row.try_get("email").map_err(map_sqlx_error)?)
                .map_err(|e| invalid(e.to_string()))?,
            password_hash: row.try_get("password_hash").map_err(map_sqlx_error)?,
            display_name: DisplayName::new(row.try_get("display_name").map_err(map_sqlx_error)?)
                .map_err(|e| invalid(e.to_string()))?,
            role: role.parse().map_err(|e: RoleError| invalid(e.to_string()))?,
            status: status
                .parse()
                .map_err(|e: AccountStatusError| invalid(e.to_string()))?,
            created_at: row.try_get("created_at").map_err(map_sqlx_error)?,
            updated_at: row.try_get("updated_at").map_err(map_sqlx_error)?,
        })
    }

    fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
        builder.push(" WHERE TRUE");

        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            let escaped = search
                .to_lowercase()
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            let pattern = format!("%{}%", escaped);

            builder
                .push(" AND (LOWER(display_name) LIKE ")
                .push_bind(pattern.clone())
                .push(" OR email LIKE ")
                .push_bind(pattern)
                .push(")");
        }

        if let Some(role) = filter.role {
            builder.push(" AND role = ").push_bind(role.as_str());
        }

        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, PersistenceError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, display_name, role, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id.0)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.display_name.as_str())
        .bind(user.role.as_str())
        .bind(user.status.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, PersistenceError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, PersistenceError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn update(&self, user: User) -> Result<User, PersistenceError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE users
            SET email = $2, password_hash = $3, display_name = $4, role = $5, status = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(user.id.0)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.display_name.as_str())
        .bind(user.role.as_str())
        .bind(user.status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        match row {
            Some(row) => Self::row_to_user(&row),
            None => Err(PersistenceError::NotFound(format!("user {}", user.id))),
        }
    }

    async fn list(
        &self,
        filter: &UserFilter,
        page: &PageRequest,
    ) -> Result<(Vec<User>, u64), PersistenceError> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users");
        Self::push_filter(&mut count_query, filter);

        let total: i64 = count_query
            .build()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .try_get(0)
            .map_err(map_sqlx_error)?;

        let mut list_query =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM users", USER_COLUMNS));
        Self::push_filter(&mut list_query, filter);
        list_query
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(i64::from(page.limit))
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);

        let rows = list_query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let users = rows
            .iter()
            .map(Self::row_to_user)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((users, total.max(0) as u64))
    }
}
