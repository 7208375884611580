//! Repository tests against a real Postgres.
//!
//! Run with `cargo test -- --ignored` and `DATABASE_URL` pointing at a server
//! whose user may create databases.

mod common;

use std::sync::Arc;

use auth::HashingCost;
use auth::IssuedToken;
use auth::PasswordHasher;
use chrono::Duration;
use chrono::Utc;
use common::RecordingNotifier;
use common::TestDb;
use common::TestEngine;
use identity_service::domain::auth::errors::AuthError;
use identity_service::domain::auth::models::LoginCommand;
use identity_service::domain::auth::models::PasswordRedemption;
use identity_service::domain::auth::models::RedemptionOutcome;
use identity_service::domain::auth::models::ResetPasswordCommand;
use identity_service::domain::auth::models::ResetToken;
use identity_service::domain::auth::models::SessionToken;
use identity_service::domain::auth::ports::AuthServicePort;
use identity_service::domain::auth::ports::ResetRepository;
use identity_service::domain::auth::ports::SessionRepository;
use identity_service::domain::auth::service::AuthService;
use identity_service::domain::errors::PersistenceError;
use identity_service::domain::health::DatabaseHealth;
use identity_service::domain::user::models::AccountStatus;
use identity_service::domain::user::models::DisplayName;
use identity_service::domain::user::models::EmailAddress;
use identity_service::domain::user::models::PageRequest;
use identity_service::domain::user::models::Password;
use identity_service::domain::user::models::Role;
use identity_service::domain::user::models::User;
use identity_service::domain::user::models::UserFilter;
use identity_service::domain::user::ports::UserRepository;
use identity_service::outbound::repositories::PostgresHealth;
use identity_service::outbound::repositories::PostgresResetRepository;
use identity_service::outbound::repositories::PostgresSessionRepository;
use identity_service::outbound::repositories::PostgresUserRepository;

fn email(value: &str) -> EmailAddress {
    EmailAddress::new(value.to_string()).unwrap()
}

fn new_user(address: &str, name: &str, role: Role) -> User {
    User::new(
        email(address),
        "$argon2id$placeholder".to_string(),
        DisplayName::new(name.to_string()).unwrap(),
        role,
    )
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_user_repository_round_trip_and_duplicates() {
    let db = TestDb::new().await;
    let repo = PostgresUserRepository::new(db.pool.clone());

    let created = repo
        .create(new_user("a@x.com", "Alice", Role::User))
        .await
        .unwrap();

    let found = repo.find_by_email(&email("a@x.com")).await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.display_name.as_str(), "Alice");
    assert_eq!(found.status, AccountStatus::Active);

    let by_id = repo.find_by_id(&created.id).await.unwrap().unwrap();
    assert_eq!(by_id.email, created.email);

    let duplicate = repo.create(new_user("a@x.com", "Other", Role::User)).await;
    assert!(matches!(duplicate, Err(PersistenceError::Duplicate(_))));

    let mut suspended = found;
    suspended.status = AccountStatus::Suspended;
    let updated = repo.update(suspended).await.unwrap();
    assert_eq!(updated.status, AccountStatus::Suspended);
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_user_repository_list_filters_and_paginates() {
    let db = TestDb::new().await;
    let repo = PostgresUserRepository::new(db.pool.clone());

    repo.create(new_user("alice@x.com", "Alice", Role::User)).await.unwrap();
    repo.create(new_user("bob@x.com", "Bob", Role::User)).await.unwrap();
    repo.create(new_user("root@x.com", "Root", Role::Admin)).await.unwrap();
    repo.create(new_user("percent@x.com", "100% Real", Role::User))
        .await
        .unwrap();

    let (items, total) = repo
        .list(&UserFilter::default(), &PageRequest::new(Some(1), Some(3)).unwrap())
        .await
        .unwrap();
    assert_eq!(total, 4);
    assert_eq!(items.len(), 3);

    let admins = UserFilter {
        role: Some(Role::Admin),
        ..UserFilter::default()
    };
    let (items, total) = repo.list(&admins, &PageRequest::default()).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].email.as_str(), "root@x.com");

    // `%` is matched literally
    let literal = UserFilter {
        search: Some("%".to_string()),
        ..UserFilter::default()
    };
    let (items, total) = repo.list(&literal, &PageRequest::default()).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].email.as_str(), "percent@x.com");
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_session_repository_revoke_and_cleanup() {
    let db = TestDb::new().await;
    let users = PostgresUserRepository::new(db.pool.clone());
    let sessions = PostgresSessionRepository::new(db.pool.clone());
    let user = users
        .create(new_user("a@x.com", "Alice", Role::User))
        .await
        .unwrap();

    let issued = |token: &str, expires_at| IssuedToken {
        token: token.to_string(),
        expires_at,
    };
    sessions
        .create(SessionToken::new(
            user.id,
            &issued("live-1", Utc::now() + Duration::days(1)),
        ))
        .await
        .unwrap();
    sessions
        .create(SessionToken::new(
            user.id,
            &issued("live-2", Utc::now() + Duration::days(1)),
        ))
        .await
        .unwrap();
    sessions
        .create(SessionToken::new(
            user.id,
            &issued("stale", Utc::now() - Duration::minutes(1)),
        ))
        .await
        .unwrap();

    assert!(sessions.revoke("live-1").await.unwrap());
    assert!(!sessions.revoke("live-1").await.unwrap());
    assert!(!sessions.revoke("missing").await.unwrap());

    assert_eq!(sessions.revoke_all(&user.id).await.unwrap(), 2);
    assert!(sessions.find("live-2").await.unwrap().unwrap().revoked);

    assert_eq!(sessions.cleanup_expired().await.unwrap(), 3);
    assert!(sessions.find("live-2").await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_reset_repository_redeem_is_atomic_and_single_use() {
    let db = TestDb::new().await;
    let users = PostgresUserRepository::new(db.pool.clone());
    let sessions = PostgresSessionRepository::new(db.pool.clone());
    let resets = PostgresResetRepository::new(db.pool.clone());
    let user = users
        .create(new_user("a@x.com", "Alice", Role::User))
        .await
        .unwrap();

    sessions
        .create(SessionToken::new(
            user.id,
            &IssuedToken {
                token: "session".to_string(),
                expires_at: Utc::now() + Duration::days(1),
            },
        ))
        .await
        .unwrap();

    let reset = resets
        .create(ResetToken::generate(user.email.clone()))
        .await
        .unwrap();
    let redemption = PasswordRedemption {
        token: reset.token.clone(),
        user_id: user.id,
        password_hash: "$argon2id$replaced".to_string(),
    };

    assert_eq!(
        resets.redeem(&redemption).await.unwrap(),
        RedemptionOutcome::Redeemed { revoked_sessions: 1 }
    );
    assert_eq!(
        resets.redeem(&redemption).await.unwrap(),
        RedemptionOutcome::AlreadyUsed
    );

    let stored = users.find_by_id(&user.id).await.unwrap().unwrap();
    assert_eq!(stored.password_hash, "$argon2id$replaced");
    assert!(sessions.find("session").await.unwrap().unwrap().revoked);
    assert!(resets.find(&reset.token).await.unwrap().unwrap().used);

    assert_eq!(resets.cleanup_expired().await.unwrap(), 1);
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_engine_reset_flow_over_postgres() {
    let db = TestDb::new().await;
    // Reuse the in-memory engine's codec settings
    let reference = TestEngine::new();
    let hasher = Arc::new(PasswordHasher::new(HashingCost::MINIMUM).unwrap());
    let notifier = Arc::new(RecordingNotifier::default());
    let engine = AuthService::new(
        Arc::new(PostgresUserRepository::new(db.pool.clone())),
        Arc::new(PostgresSessionRepository::new(db.pool.clone())),
        Arc::new(PostgresResetRepository::new(db.pool.clone())),
        Arc::clone(&notifier),
        Arc::clone(&hasher),
        Arc::clone(&reference.codec),
    );

    let user = User::new(
        email("a@x.com"),
        hasher.hash("secret1").unwrap(),
        DisplayName::new("Alice".to_string()).unwrap(),
        Role::User,
    );
    PostgresUserRepository::new(db.pool.clone())
        .create(user)
        .await
        .unwrap();

    let tokens = engine
        .login(LoginCommand {
            email: email("a@x.com"),
            password: "secret1".to_string(),
        })
        .await
        .unwrap()
        .tokens;

    engine.forgot_password(&email("a@x.com")).await.unwrap();
    let token = notifier
        .wait_for_token("a@x.com", std::time::Duration::from_secs(2))
        .await
        .unwrap();

    engine
        .reset_password(ResetPasswordCommand {
            token,
            new_password: Password::new("secret9".to_string()).unwrap(),
        })
        .await
        .unwrap();

    assert_eq!(
        engine.refresh(&tokens.refresh.token).await.unwrap_err(),
        AuthError::TokenRevoked
    );
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn test_postgres_health_ping() {
    let db = TestDb::new().await;

    PostgresHealth::new(db.pool.clone()).ping().await.unwrap();
}
