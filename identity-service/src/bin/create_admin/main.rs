use std::env;

use anyhow::Context;
use auth::PasswordHasher;
use identity_service::config::Config;
use identity_service::domain::user::models::DisplayName;
use identity_service::domain::user::models::EmailAddress;
use identity_service::domain::user::models::Password;
use identity_service::domain::user::models::Role;
use identity_service::domain::user::models::User;
use identity_service::domain::user::ports::UserRepository;
use identity_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_EMAIL: &str = "admin@example.com";
const DEFAULT_PASSWORD: &str = "admin123";
const DEFAULT_NAME: &str = "Admin User";

/// Creates the initial administrator account if it does not exist yet.
///
/// Reads ADMIN_EMAIL, ADMIN_PASSWORD and ADMIN_NAME from the environment.
#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "create_admin=info,identity_service=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;

    let email = EmailAddress::new(env_or("ADMIN_EMAIL", DEFAULT_EMAIL))
        .context("ADMIN_EMAIL is not a valid email address")?;
    let password = Password::new(env_or("ADMIN_PASSWORD", DEFAULT_PASSWORD))
        .context("ADMIN_PASSWORD does not meet the password policy")?;
    let display_name = DisplayName::new(env_or("ADMIN_NAME", DEFAULT_NAME))
        .context("ADMIN_NAME is not a valid display name")?;

    let pg_pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database.url)
        .await?;
    sqlx::migrate!("./migrations").run(&pg_pool).await?;

    let repository = PostgresUserRepository::new(pg_pool);

    if let Some(existing) = repository.find_by_email(&email).await? {
        tracing::info!(user_id = %existing.id, email = %email, "Admin user already exists");
        return Ok(());
    }

    let hasher = PasswordHasher::new(config.hashing_cost())?;
    let password_hash = hasher.hash(password.expose())?;

    let admin = repository
        .create(User::new(email, password_hash, display_name, Role::Admin))
        .await?;

    tracing::info!(user_id = %admin.id, email = %admin.email, "Admin user created");

    Ok(())
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
