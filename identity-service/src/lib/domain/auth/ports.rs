use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::NotifierError;
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
use crate::domain::errors::PersistenceError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Port for the credential lifecycle engine.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new active identity with role `user`.
    ///
    /// # Errors
    /// * `AlreadyExists` - Email is already registered
    /// * `Internal` - Hashing failed
    /// * `PersistenceUnavailable` - Store unreachable
    async fn register(&self, command: RegisterCommand) -> Result<User, AuthError>;

    /// Check credentials and open a session.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `AccountNotActive` - Identity is inactive or suspended
    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, AuthError>;

    /// Revoke the session backed by `refresh_token`. Idempotent.
    async fn logout(&self, user_id: &UserId, refresh_token: &str) -> Result<(), AuthError>;

    /// Exchange a live refresh token for a new pair, revoking the old one.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature, algorithm or timing check failed
    /// * `TokenNotFound` - No session record for this token
    /// * `TokenRevoked` - Token already revoked or rotated
    /// * `TokenExpired` - Session record expired
    /// * `UserNotFound` - Subject no longer exists
    /// * `AccountNotActive` - Identity is inactive or suspended
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError>;

    /// Issue a reset token if `email` is registered. Always succeeds for unknown emails.
    async fn forgot_password(&self, email: &EmailAddress) -> Result<(), AuthError>;

    /// Redeem a reset token, replace the password and revoke every session.
    ///
    /// # Errors
    /// * `InvalidToken` - Unknown reset token
    /// * `TokenExpired` - Reset token expired
    /// * `TokenAlreadyUsed` - Reset token already redeemed
    /// * `UserNotFound` - Identity for the token's email is gone
    async fn reset_password(&self, command: ResetPasswordCommand) -> Result<(), AuthError>;
}

/// Persistence operations for refresh token sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync + 'static {
    /// # Errors
    /// * `Duplicate` - Token string already stored
    async fn create(&self, session: SessionToken) -> Result<SessionToken, PersistenceError>;

    async fn find(&self, token: &str) -> Result<Option<SessionToken>, PersistenceError>;

    /// Mark a session revoked. Returns `false` if it was missing or already revoked.
    async fn revoke(&self, token: &str) -> Result<bool, PersistenceError>;

    /// Revoke every live session of `user_id`, returning how many were flipped.
    async fn revoke_all(&self, user_id: &UserId) -> Result<u64, PersistenceError>;

    /// Delete expired or revoked sessions, returning how many were removed.
    async fn cleanup_expired(&self) -> Result<u64, PersistenceError>;
}

/// Persistence operations for password reset tokens.
#[async_trait]
pub trait ResetRepository: Send + Sync + 'static {
    /// # Errors
    /// * `Duplicate` - Token string already stored
    async fn create(&self, reset: ResetToken) -> Result<ResetToken, PersistenceError>;

    async fn find(&self, token: &str) -> Result<Option<ResetToken>, PersistenceError>;

    /// Mark a reset token used. Returns `false` if it was missing or already used.
    async fn mark_used(&self, token: &str) -> Result<bool, PersistenceError>;

    /// Atomically mark the token used, store the new digest and revoke all
    /// of the user's sessions. Nothing changes when the token was already used.
    async fn redeem(
        &self,
        redemption: &PasswordRedemption,
    ) -> Result<RedemptionOutcome, PersistenceError>;

    /// Delete expired or used reset tokens, returning how many were removed.
    async fn cleanup_expired(&self) -> Result<u64, PersistenceError>;
}

/// Delivers reset tokens to their owners out of band.
#[async_trait]
pub trait ResetNotifier: Send + Sync + 'static {
    /// # Errors
    /// * `SerializationFailed` - Notice could not be encoded
    /// * `PublishFailed` - Broker rejected or timed out
    async fn send_reset_token(&self, notice: &ResetNotice) -> Result<(), NotifierError>;
}
