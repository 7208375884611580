use async_trait::async_trait;

use crate::domain::errors::PersistenceError;
use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::PageRequest;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserFilter;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserPage;
use crate::user::errors::UserError;

/// Port for user management operations available to authenticated callers.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Retrieve the caller's own identity.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `PersistenceUnavailable` - Store unreachable
    async fn get_profile(&self, id: &UserId) -> Result<User, UserError>;

    /// Replace the caller's display name.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `PersistenceUnavailable` - Store unreachable
    async fn update_profile(
        &self,
        id: &UserId,
        command: UpdateProfileCommand,
    ) -> Result<User, UserError>;

    /// Verify the old password and store a digest of the new one.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `InvalidPassword` - Old password does not match
    /// * `Internal` - Hashing failed
    async fn change_password(
        &self,
        id: &UserId,
        command: ChangePasswordCommand,
    ) -> Result<(), UserError>;

    /// List identities matching `filter`, one page at a time.
    ///
    /// # Errors
    /// * `PersistenceUnavailable` - Store unreachable
    async fn list_users(&self, filter: UserFilter, page: PageRequest)
        -> Result<UserPage, UserError>;
}

/// Persistence operations for the identity aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `Duplicate` - Email is already registered
    /// * `Unavailable` - Store unreachable
    async fn create(&self, user: User) -> Result<User, PersistenceError>;

    /// Retrieve user by normalized email.
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, PersistenceError>;

    /// Retrieve user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, PersistenceError>;

    /// Overwrite mutable fields of an existing user and bump `updated_at`.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    async fn update(&self, user: User) -> Result<User, PersistenceError>;

    /// Return one page of users matching `filter`, newest first, with the total match count.
    async fn list(
        &self,
        filter: &UserFilter,
        page: &PageRequest,
    ) -> Result<(Vec<User>, u64), PersistenceError>;
}
