use std::sync::Arc;
use std::time::Duration;

use auth::PasswordHasher;
use auth::TokenCodec;
use identity_service::cleanup::CleanupTask;
use identity_service::config::Config;
use identity_service::domain::auth::service::AuthService;
use identity_service::domain::user::service::UserService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::notifications::KafkaResetNotifier;
use identity_service::outbound::repositories::PostgresHealth;
use identity_service::outbound::repositories::PostgresResetRepository;
use identity_service::outbound::repositories::PostgresSessionRepository;
use identity_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        max_connections = config.database.max_connections,
        access_ttl_minutes = config.jwt.access_ttl_minutes,
        refresh_ttl_days = config.jwt.refresh_ttl_days,
        kafka_brokers = %config.kafka.brokers,
        kafka_topic = %config.kafka.topic,
        cleanup_interval_secs = config.cleanup.interval_secs,
        cors_allowed_origins = ?config.cors.allowed_origins,
        "Configuration loaded"
    );

    let token_codec = Arc::new(TokenCodec::new(&config.token_settings())?);
    let password_hasher = Arc::new(PasswordHasher::new(config.hashing_cost())?);

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let session_repository = Arc::new(PostgresSessionRepository::new(pg_pool.clone()));
    let reset_repository = Arc::new(PostgresResetRepository::new(pg_pool.clone()));
    let health_check = Arc::new(PostgresHealth::new(pg_pool));
    let reset_notifier = Arc::new(KafkaResetNotifier::new(&config.kafka)?);

    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&user_repository),
        Arc::clone(&session_repository),
        Arc::clone(&reset_repository),
        reset_notifier,
        Arc::clone(&password_hasher),
        Arc::clone(&token_codec),
    ));
    let user_service = Arc::new(UserService::new(user_repository, password_hasher));

    let cleanup_task = CleanupTask::new(
        session_repository,
        reset_repository,
        Duration::from_secs(config.cleanup.interval_secs),
    );
    tracing::info!(
        interval_secs = config.cleanup.interval_secs,
        "Starting token cleanup task"
    );
    tokio::spawn(async move {
        cleanup_task.start().await;
    });

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        auth_service,
        user_service,
        token_codec,
        health_check,
        &config.cors,
    );
    axum::serve(http_listener, http_application).await?;

    Ok(())
}
