use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use thiserror::Error;

use crate::jwt::AccessClaims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::RefreshClaims;

/// Signing secrets and lifetimes for the two token kinds.
///
/// Immutable once a [`TokenCodec`] is built from it.
#[derive(Clone)]
pub struct TokenSettings {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

/// A freshly signed token together with its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenCodecError {
    #[error("Token is expired")]
    Expired,

    #[error("Token is not valid yet")]
    NotYetValid,

    #[error("Token is invalid: {0}")]
    Invalid(String),

    #[error("Failed to sign token: {0}")]
    Encoding(String),

    #[error("Token codec misconfigured: {0}")]
    Misconfigured(String),
}

impl From<JwtError> for TokenCodecError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::TokenExpired => TokenCodecError::Expired,
            JwtError::TokenNotYetValid => TokenCodecError::NotYetValid,
            JwtError::EncodingFailed(msg) => TokenCodecError::Encoding(msg),
            JwtError::InvalidAlgorithm => {
                TokenCodecError::Invalid("signing algorithm not accepted".to_string())
            }
            JwtError::InvalidToken(msg) => TokenCodecError::Invalid(msg),
        }
    }
}

/// Issues and verifies access and refresh tokens.
///
/// Each kind has its own HMAC secret, so a leaked refresh secret cannot mint
/// access tokens and vice versa. The codec is pure: revocation lives with
/// whoever persists refresh tokens.
pub struct TokenCodec {
    access: JwtHandler,
    refresh: JwtHandler,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenCodec {
    /// Build a codec from settings.
    ///
    /// # Errors
    /// * `Misconfigured` - A secret is empty, the two secrets are equal, or a TTL is not positive
    pub fn new(settings: &TokenSettings) -> Result<Self, TokenCodecError> {
        if settings.access_secret.is_empty() || settings.refresh_secret.is_empty() {
            return Err(TokenCodecError::Misconfigured(
                "signing secrets must not be empty".to_string(),
            ));
        }
        if settings.access_secret == settings.refresh_secret {
            return Err(TokenCodecError::Misconfigured(
                "access and refresh secrets must differ".to_string(),
            ));
        }
        if settings.access_ttl <= Duration::zero() || settings.refresh_ttl <= Duration::zero() {
            return Err(TokenCodecError::Misconfigured(
                "token lifetimes must be positive".to_string(),
            ));
        }

        Ok(Self {
            access: JwtHandler::new(settings.access_secret.as_bytes()),
            refresh: JwtHandler::new(settings.refresh_secret.as_bytes()),
            access_ttl: settings.access_ttl,
            refresh_ttl: settings.refresh_ttl,
        })
    }

    /// Issue an access token for `subject` carrying `role`.
    pub fn issue_access(
        &self,
        subject: impl ToString,
        role: impl ToString,
    ) -> Result<IssuedToken, TokenCodecError> {
        let claims = AccessClaims::new(subject, role, Utc::now(), self.access_ttl);
        let token = self.access.encode(&claims)?;

        Ok(IssuedToken {
            token,
            expires_at: claims.expires_at(),
        })
    }

    /// Issue a refresh token for `subject`.
    pub fn issue_refresh(&self, subject: impl ToString) -> Result<IssuedToken, TokenCodecError> {
        let claims = RefreshClaims::new(subject, Utc::now(), self.refresh_ttl);
        let token = self.refresh.encode(&claims)?;

        Ok(IssuedToken {
            token,
            expires_at: claims.expires_at(),
        })
    }

    /// Verify an access token and return its claims.
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, TokenCodecError> {
        Ok(self.access.decode(token)?)
    }

    /// Verify a refresh token and return its claims.
    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, TokenCodecError> {
        Ok(self.refresh.decode(token)?)
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }
}
