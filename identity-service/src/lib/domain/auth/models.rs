use std::fmt;

use auth::IssuedToken;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::user::models::DisplayName;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Persisted record of one issued refresh token.
///
/// Only `revoked` ever changes after creation.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub id: Uuid,
    pub user_id: UserId,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
}

impl SessionToken {
    /// Record a freshly issued refresh token for `user_id`.
    pub fn new(user_id: UserId, issued: &IssuedToken) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            token: issued.token.clone(),
            expires_at: issued.expires_at,
            revoked: false,
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("expires_at", &self.expires_at)
            .field("revoked", &self.revoked)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Persisted single-use password reset token.
#[derive(Clone, PartialEq, Eq)]
pub struct ResetToken {
    pub id: Uuid,
    pub email: EmailAddress,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

impl ResetToken {
    /// Lifetime of a reset token.
    pub fn ttl() -> Duration {
        Duration::hours(1)
    }

    /// Generate a fresh reset token for `email`.
    ///
    /// The token string is 64 hex characters drawn from two v4 UUIDs.
    pub fn generate(email: EmailAddress) -> Self {
        let now = Utc::now();
        let token = format!(
            "{}{}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        );

        Self {
            id: Uuid::new_v4(),
            email,
            token,
            expires_at: now + Self::ttl(),
            used: false,
            created_at: now,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

impl fmt::Debug for ResetToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetToken")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("expires_at", &self.expires_at)
            .field("used", &self.used)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Everything a store needs to redeem a reset token in one step:
/// mark the token used, replace the digest, revoke the user's sessions.
#[derive(Debug, Clone)]
pub struct PasswordRedemption {
    pub token: String,
    pub user_id: UserId,
    pub password_hash: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedemptionOutcome {
    Redeemed { revoked_sessions: u64 },
    /// A concurrent redemption won; nothing was changed.
    AlreadyUsed,
}

/// Payload handed to the reset notifier.
#[derive(Debug, Clone)]
pub struct ResetNotice {
    pub email: EmailAddress,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<&ResetToken> for ResetNotice {
    fn from(reset: &ResetToken) -> Self {
        Self {
            email: reset.email.clone(),
            token: reset.token.clone(),
            expires_at: reset.expires_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub tokens: TokenPair,
    pub user: User,
}

/// Command to register a new identity with validated fields
#[derive(Debug)]
pub struct RegisterCommand {
    pub email: EmailAddress,
    pub password: Password,
    pub display_name: DisplayName,
}

/// Command to log in. The password is checked against the digest, not the policy.
pub struct LoginCommand {
    pub email: EmailAddress,
    pub password: String,
}

impl fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCommand")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

pub struct ResetPasswordCommand {
    pub token: String,
    pub new_password: Password,
}

impl fmt::Debug for ResetPasswordCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetPasswordCommand")
            .field("new_password", &self.new_password)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> EmailAddress {
        EmailAddress::new("a@x.com".to_string()).unwrap()
    }

    #[test]
    fn test_reset_token_generation() {
        let first = ResetToken::generate(email());
        let second = ResetToken::generate(email());

        assert_eq!(first.token.len(), 64);
        assert!(first.token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first.token, second.token);
        assert!(!first.used);
        assert_eq!(first.expires_at - first.created_at, Duration::hours(1));
    }

    #[test]
    fn test_reset_token_expiry() {
        let reset = ResetToken::generate(email());

        assert!(!reset.is_expired(Utc::now()));
        assert!(reset.is_expired(Utc::now() + Duration::hours(2)));
    }

    #[test]
    fn test_session_token_mirrors_issued_token() {
        let issued = IssuedToken {
            token: "refresh-token".to_string(),
            expires_at: Utc::now() + Duration::days(7),
        };
        let user_id = UserId::new();

        let session = SessionToken::new(user_id, &issued);

        assert_eq!(session.user_id, user_id);
        assert_eq!(session.token, "refresh-token");
        assert_eq!(session.expires_at, issued.expires_at);
        assert!(!session.revoked);
        assert!(!format!("{:?}", session).contains("refresh-token"));
    }

    #[test]
    fn test_commands_redact_secrets() {
        let login = LoginCommand {
            email: email(),
            password: "hunter22".to_string(),
        };
        assert!(!format!("{:?}", login).contains("hunter22"));

        let reset = ResetPasswordCommand {
            token: "a1b2c3d4".to_string(),
            new_password: Password::new("new-secret".to_string()).unwrap(),
        };
        let debug = format!("{:?}", reset);
        assert!(!debug.contains("a1b2c3d4"));
        assert!(!debug.contains("new-secret"));
    }
}
