//! Authentication utilities library
//!
//! Provides the credential primitives used by the identity service:
//! - Password hashing (Argon2id, configurable cost)
//! - JWT access/refresh token issuing and verification
//!
//! Neither component touches persistence; session revocation is the caller's job.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::{HashingCost, PasswordHasher};
//!
//! let hasher = PasswordHasher::new(HashingCost::MINIMUM).unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("other_password", &hash));
//! ```
//!
//! ## Access and Refresh Tokens
//! ```
//! use auth::{TokenCodec, TokenSettings};
//! use chrono::Duration;
//!
//! let codec = TokenCodec::new(&TokenSettings {
//!     access_secret: "access_secret_key_at_least_32_bytes!".to_string(),
//!     refresh_secret: "refresh_secret_key_at_least_32_bytes".to_string(),
//!     access_ttl: Duration::minutes(15),
//!     refresh_ttl: Duration::days(7),
//! })
//! .unwrap();
//!
//! let access = codec.issue_access("user123", "admin").unwrap();
//! let claims = codec.verify_access(&access.token).unwrap();
//! assert_eq!(claims.role, "admin");
//!
//! let refresh = codec.issue_refresh("user123").unwrap();
//! assert!(codec.verify_access(&refresh.token).is_err());
//! ```

pub mod codec;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use codec::IssuedToken;
pub use codec::TokenCodec;
pub use codec::TokenCodecError;
pub use codec::TokenSettings;
pub use jwt::AccessClaims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::RefreshClaims;
pub use password::HashingCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
