use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenCodec;
use chrono::Utc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::PersistenceContext;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::LoginOutcome;
use crate::domain::auth::models::PasswordRedemption;
use crate::domain::auth::models::RedemptionOutcome;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::ResetNotice;
use crate::domain::auth::models::ResetPasswordCommand;
use crate::domain::auth::models::ResetToken;
use crate::domain::auth::models::SessionToken;
use crate::domain::auth::models::TokenPair;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::ResetNotifier;
use crate::domain::auth::ports::ResetRepository;
use crate::domain::auth::ports::SessionRepository;
use crate::domain::errors::PersistenceError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

/// Credential lifecycle engine.
///
/// Stateless apart from its injected collaborators; all durable state lives
/// behind the repository ports.
pub struct AuthService<UR, SR, RR, RN>
where
    UR: UserRepository,
    SR: SessionRepository,
    RR: ResetRepository,
    RN: ResetNotifier,
{
    users: Arc<UR>,
    sessions: Arc<SR>,
    resets: Arc<RR>,
    notifier: Arc<RN>,
    password_hasher: Arc<PasswordHasher>,
    token_codec: Arc<TokenCodec>,
}

impl<UR, SR, RR, RN> AuthService<UR, SR, RR, RN>
where
    UR: UserRepository,
    SR: SessionRepository,
    RR: ResetRepository,
    RN: ResetNotifier,
{
    /// Create a new engine with injected dependencies.
    ///
    /// # Arguments
    /// * `users` - Identity persistence
    /// * `sessions` - Refresh token persistence
    /// * `resets` - Reset token persistence
    /// * `notifier` - Reset token delivery
    /// * `password_hasher` - Shared Argon2 hasher
    /// * `token_codec` - Shared access/refresh token codec
    pub fn new(
        users: Arc<UR>,
        sessions: Arc<SR>,
        resets: Arc<RR>,
        notifier: Arc<RN>,
        password_hasher: Arc<PasswordHasher>,
        token_codec: Arc<TokenCodec>,
    ) -> Self {
        Self {
            users,
            sessions,
            resets,
            notifier,
            password_hasher,
            token_codec,
        }
    }

    fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        self.password_hasher
            .hash(password)
            .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// Issue a token pair for `user` and persist the refresh half.
    async fn open_session(&self, user: &User) -> Result<TokenPair, AuthError> {
        let access = self
            .token_codec
            .issue_access(user.id, user.role.as_str())
            .map_err(|e| AuthError::Internal(format!("Access token signing failed: {}", e)))?;
        let refresh = self
            .token_codec
            .issue_refresh(user.id)
            .map_err(|e| AuthError::Internal(format!("Refresh token signing failed: {}", e)))?;

        self.sessions
            .create(SessionToken::new(user.id, &refresh))
            .await
            .context("storing session")?;

        Ok(TokenPair { access, refresh })
    }
}

#[async_trait]
impl<UR, SR, RR, RN> AuthServicePort for AuthService<UR, SR, RR, RN>
where
    UR: UserRepository,
    SR: SessionRepository,
    RR: ResetRepository,
    RN: ResetNotifier,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, AuthError> {
        let email = command.email.to_string();

        if self
            .users
            .find_by_email(&command.email)
            .await
            .context("looking up email")?
            .is_some()
        {
            return Err(AuthError::AlreadyExists(email));
        }

        let password_hash = self.hash_password(command.password.expose())?;
        let user = User::new(
            command.email,
            password_hash,
            command.display_name,
            Role::User,
        );

        match self.users.create(user).await {
            Ok(created) => {
                tracing::info!(user_id = %created.id, "User registered");
                Ok(created)
            }
            // Lost a race with a concurrent registration of the same email
            Err(PersistenceError::Duplicate(_)) => Err(AuthError::AlreadyExists(email)),
            Err(e) => Err(e).context("creating user"),
        }
    }

    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, AuthError> {
        let user = match self
            .users
            .find_by_email(&command.email)
            .await
            .context("looking up email")?
        {
            Some(user) => user,
            None => {
                self.password_hasher.verify_decoy(&command.password);
                tracing::warn!("Login attempt for unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !self
            .password_hasher
            .verify(&command.password, &user.password_hash)
        {
            tracing::warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active() {
            tracing::warn!(
                user_id = %user.id,
                status = %user.status,
                "Login attempt on inactive account"
            );
            return Err(AuthError::AccountNotActive);
        }

        let tokens = self.open_session(&user).await?;
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginOutcome { tokens, user })
    }

    async fn logout(&self, user_id: &UserId, refresh_token: &str) -> Result<(), AuthError> {
        match self
            .sessions
            .find(refresh_token)
            .await
            .context("finding session")?
        {
            None => {
                tracing::debug!(user_id = %user_id, "Logout with unknown refresh token");
            }
            Some(session) if session.user_id != *user_id => {
                tracing::warn!(
                    user_id = %user_id,
                    owner_id = %session.user_id,
                    "Logout with a refresh token owned by another user ignored"
                );
            }
            Some(_) => {
                self.sessions
                    .revoke(refresh_token)
                    .await
                    .context("revoking session")?;
                tracing::info!(user_id = %user_id, "User logged out");
            }
        }

        Ok(())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self
            .token_codec
            .verify_refresh(refresh_token)
            .map_err(|e| {
                tracing::debug!(error = %e, "Refresh token rejected by codec");
                AuthError::InvalidToken
            })?;

        let session = self
            .sessions
            .find(refresh_token)
            .await
            .context("finding session")?
            .ok_or(AuthError::TokenNotFound)?;

        if session.revoked {
            tracing::warn!(
                user_id = %session.user_id,
                "Revoked refresh token presented, possible replay"
            );
            return Err(AuthError::TokenRevoked);
        }

        if session.is_expired(Utc::now()) {
            return Err(AuthError::TokenExpired);
        }

        let user_id = UserId::from_string(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
        if session.user_id != user_id {
            tracing::warn!(
                user_id = %user_id,
                owner_id = %session.user_id,
                "Refresh token subject does not match its session"
            );
            return Err(AuthError::InvalidToken);
        }

        let user = self
            .users
            .find_by_id(&user_id)
            .await
            .context("loading user")?
            .ok_or(AuthError::UserNotFound)?;

        if !user.is_active() {
            return Err(AuthError::AccountNotActive);
        }

        if !self
            .sessions
            .revoke(refresh_token)
            .await
            .context("revoking session")?
        {
            tracing::warn!(
                user_id = %user_id,
                "Refresh token rotated concurrently, possible replay"
            );
            return Err(AuthError::TokenRevoked);
        }

        let tokens = self.open_session(&user).await?;
        tracing::debug!(user_id = %user_id, "Refresh token rotated");

        Ok(tokens)
    }

    async fn forgot_password(&self, email: &EmailAddress) -> Result<(), AuthError> {
        let Some(user) = self
            .users
            .find_by_email(email)
            .await
            .context("looking up email")?
        else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(());
        };

        let reset = self
            .resets
            .create(ResetToken::generate(email.clone()))
            .await
            .context("storing reset token")?;

        // Delivery latency must not reach the caller
        let notifier = Arc::clone(&self.notifier);
        let notice = ResetNotice::from(&reset);
        let user_id = user.id;
        tokio::spawn(async move {
            if let Err(e) = notifier.send_reset_token(&notice).await {
                tracing::error!(
                    user_id = %user_id,
                    error = %e,
                    "Failed to deliver password reset notification"
                );
            }
        });

        tracing::info!(user_id = %user.id, "Password reset token issued");
        Ok(())
    }

    async fn reset_password(&self, command: ResetPasswordCommand) -> Result<(), AuthError> {
        let reset = self
            .resets
            .find(&command.token)
            .await
            .context("finding reset token")?
            .ok_or(AuthError::InvalidToken)?;

        if reset.is_expired(Utc::now()) {
            return Err(AuthError::TokenExpired);
        }

        if reset.used {
            return Err(AuthError::TokenAlreadyUsed);
        }

        let user = self
            .users
            .find_by_email(&reset.email)
            .await
            .context("looking up email")?
            .ok_or(AuthError::UserNotFound)?;

        let redemption = PasswordRedemption {
            token: command.token,
            user_id: user.id,
            password_hash: self.hash_password(command.new_password.expose())?,
        };

        match self
            .resets
            .redeem(&redemption)
            .await
            .context("redeeming reset token")?
        {
            RedemptionOutcome::Redeemed { revoked_sessions } => {
                tracing::info!(user_id = %user.id, revoked_sessions, "Password reset");
                Ok(())
            }
            RedemptionOutcome::AlreadyUsed => {
                tracing::warn!(user_id = %user.id, "Reset token redeemed concurrently");
                Err(AuthError::TokenAlreadyUsed)
            }
        }
    }
}
