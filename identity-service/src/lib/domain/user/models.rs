use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::user::errors::AccountStatusError;
use crate::user::errors::DisplayNameError;
use crate::user::errors::EmailError;
use crate::user::errors::PageError;
use crate::user::errors::PasswordPolicyError;
use crate::user::errors::RoleError;
use crate::user::errors::UserIdError;

/// User aggregate entity.
///
/// Represents a registered identity. Has no `Serialize` impl; outward views
/// are built explicitly by the HTTP layer and never include the digest.
#[derive(Clone)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub display_name: DisplayName,
    pub role: Role,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a new active identity with a fresh id.
    pub fn new(
        email: EmailAddress,
        password_hash: String,
        display_name: DisplayName,
        role: Role,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            email,
            password_hash,
            display_name,
            role,
            status: AccountStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("display_name", &self.display_name)
            .field("role", &self.role)
            .field("status", &self.status)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    ///
    /// # Returns
    /// UserId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Arguments
    /// * `s` - UUID string to parse
    ///
    /// # Returns
    /// Parsed UserId
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validated with an RFC 5322 parser, then stored trimmed and lower-cased so
/// lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Arguments
    /// * `email` - Raw email string
    ///
    /// # Returns
    /// Validated, normalized EmailAddress value object
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let normalized = email.trim().to_lowercase();
        email_address::EmailAddress::from_str(&normalized)
            .map(|_| EmailAddress(normalized))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name value type
///
/// Trimmed, 1-100 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    const MIN_LENGTH: usize = 1;
    const MAX_LENGTH: usize = 100;

    /// Create a new valid display name.
    ///
    /// # Errors
    /// * `TooShort` - Empty after trimming
    /// * `TooLong` - More than 100 characters after trimming
    pub fn new(name: String) -> Result<Self, DisplayNameError> {
        let name = name.trim().to_string();
        let length = name.chars().count();
        if length < Self::MIN_LENGTH {
            Err(DisplayNameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(DisplayNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password accepted from a caller.
///
/// Only checks the length policy; never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 6;
    const MAX_LENGTH: usize = 128;

    /// # Errors
    /// * `TooShort` - Fewer than 6 characters
    /// * `TooLong` - More than 128 characters
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
            })
        } else if length > Self::MAX_LENGTH {
            Err(PasswordPolicyError::TooLong {
                max: Self::MAX_LENGTH,
            })
        } else {
            Ok(Self(password))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Only `Active` identities may log in or rotate tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountStatus {
    Active,
    Inactive,
    Suspended,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
            AccountStatus::Suspended => "suspended",
        }
    }
}

impl FromStr for AccountStatus {
    type Err = AccountStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AccountStatus::Active),
            "inactive" => Ok(AccountStatus::Inactive),
            "suspended" => Ok(AccountStatus::Suspended),
            other => Err(AccountStatusError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Command to change the caller's display name
#[derive(Debug)]
pub struct UpdateProfileCommand {
    pub display_name: DisplayName,
}

/// Command to change the caller's password.
///
/// The old password is not policy-checked, only verified against the stored digest.
pub struct ChangePasswordCommand {
    pub old_password: String,
    pub new_password: Password,
}

impl fmt::Debug for ChangePasswordCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangePasswordCommand")
            .field("old_password", &"<redacted>")
            .field("new_password", &self.new_password)
            .finish()
    }
}

/// Optional filters for the admin user listing.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Case-insensitive substring of display name or email
    pub search: Option<String>,
    pub role: Option<Role>,
    pub status: Option<AccountStatus>,
}

impl UserFilter {
    /// Whether `user` passes every filter that is set.
    pub fn matches(&self, user: &User) -> bool {
        let search_ok = match self.search.as_deref() {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                user.display_name.as_str().to_lowercase().contains(&term)
                    || user.email.as_str().contains(&term)
            }
            _ => true,
        };

        search_ok
            && self.role.map_or(true, |role| user.role == role)
            && self.status.map_or(true, |status| user.status == status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 100;

    /// Build a page request, applying defaults for missing values.
    ///
    /// # Errors
    /// * `InvalidPage` - Page is zero
    /// * `InvalidLimit` - Limit is zero or above 100
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Result<Self, PageError> {
        let page = page.unwrap_or(Self::DEFAULT_PAGE);
        let limit = limit.unwrap_or(Self::DEFAULT_LIMIT);

        if page < 1 {
            return Err(PageError::InvalidPage(page));
        }
        if limit < 1 || limit > Self::MAX_LIMIT {
            return Err(PageError::InvalidLimit {
                max: Self::MAX_LIMIT,
                actual: limit,
            });
        }

        Ok(Self { page, limit })
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// One page of the admin user listing.
#[derive(Debug, Clone)]
pub struct UserPage {
    pub items: Vec<User>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl UserPage {
    pub fn new(items: Vec<User>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            limit: request.limit,
            total_pages: total.div_ceil(u64::from(request.limit)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, email: &str, role: Role) -> User {
        User::new(
            EmailAddress::new(email.to_string()).unwrap(),
            "$argon2id$hash".to_string(),
            DisplayName::new(name.to_string()).unwrap(),
            role,
        )
    }

    #[test]
    fn test_email_is_normalized() {
        let email = EmailAddress::new("  Alice@Example.COM ".to_string()).unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
    }

    #[test]
    fn test_email_rejects_garbage() {
        assert!(matches!(
            EmailAddress::new("not-an-email".to_string()),
            Err(EmailError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_display_name_bounds() {
        assert!(matches!(
            DisplayName::new("   ".to_string()),
            Err(DisplayNameError::TooShort { min: 1, actual: 0 })
        ));
        assert!(matches!(
            DisplayName::new("x".repeat(101)),
            Err(DisplayNameError::TooLong { max: 100, .. })
        ));
        assert_eq!(DisplayName::new(" A ".to_string()).unwrap().as_str(), "A");
    }

    #[test]
    fn test_password_policy() {
        assert!(matches!(
            Password::new("12345".to_string()),
            Err(PasswordPolicyError::TooShort { min: 6 })
        ));
        assert!(Password::new("secret1".to_string()).is_ok());
    }

    #[test]
    fn test_debug_output_redacts_secrets() {
        let password = Password::new("hunter22".to_string()).unwrap();
        assert!(!format!("{:?}", password).contains("hunter22"));

        let user = user("Alice", "alice@example.com", Role::User);
        assert!(!format!("{:?}", user).contains("$argon2id$hash"));

        let command = ChangePasswordCommand {
            old_password: "old-secret".to_string(),
            new_password: Password::new("new-secret".to_string()).unwrap(),
        };
        let debug = format!("{:?}", command);
        assert!(!debug.contains("old-secret"));
        assert!(!debug.contains("new-secret"));
    }

    #[test]
    fn test_role_and_status_round_trip_strings() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("root".parse::<Role>().is_err());
        assert_eq!(
            "suspended".parse::<AccountStatus>().unwrap(),
            AccountStatus::Suspended
        );
        assert_eq!(AccountStatus::Inactive.as_str(), "inactive");
    }

    #[test]
    fn test_page_request_defaults_and_limits() {
        assert_eq!(PageRequest::new(None, None).unwrap(), PageRequest::default());
        assert_eq!(PageRequest::new(Some(3), Some(20)).unwrap().offset(), 40);
        assert!(matches!(
            PageRequest::new(Some(0), None),
            Err(PageError::InvalidPage(0))
        ));
        assert!(matches!(
            PageRequest::new(None, Some(101)),
            Err(PageError::InvalidLimit { max: 100, actual: 101 })
        ));
    }

    #[test]
    fn test_user_page_total_pages_rounds_up() {
        let page = UserPage::new(vec![], 21, PageRequest::new(Some(1), Some(10)).unwrap());
        assert_eq!(page.total_pages, 3);

        let empty = UserPage::new(vec![], 0, PageRequest::default());
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_filter_matches_search_role_and_status() {
        let alice = user("Alice Smith", "alice@example.com", Role::Admin);

        let by_name = UserFilter {
            search: Some("SMITH".to_string()),
            ..Default::default()
        };
        assert!(by_name.matches(&alice));

        let by_email = UserFilter {
            search: Some("example.com".to_string()),
            role: Some(Role::Admin),
            status: Some(AccountStatus::Active),
        };
        assert!(by_email.matches(&alice));

        let wrong_role = UserFilter {
            role: Some(Role::User),
            ..Default::default()
        };
        assert!(!wrong_role.matches(&alice));
    }
}
