use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;

use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::PageRequest;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserFilter;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserPage;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user management.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: Arc<PasswordHasher>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `password_hasher` - Shared Argon2 hasher
    pub fn new(repository: Arc<UR>, password_hasher: Arc<PasswordHasher>) -> Self {
        Self {
            repository,
            password_hasher,
        }
    }

    async fn load(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn get_profile(&self, id: &UserId) -> Result<User, UserError> {
        self.load(id).await
    }

    async fn update_profile(
        &self,
        id: &UserId,
        command: UpdateProfileCommand,
    ) -> Result<User, UserError> {
        let mut user = self.load(id).await?;
        user.display_name = command.display_name;

        let updated = self.repository.update(user).await?;
        tracing::info!(user_id = %updated.id, "Profile updated");

        Ok(updated)
    }

    async fn change_password(
        &self,
        id: &UserId,
        command: ChangePasswordCommand,
    ) -> Result<(), UserError> {
        let mut user = self.load(id).await?;

        if !self
            .password_hasher
            .verify(&command.old_password, &user.password_hash)
        {
            tracing::warn!(user_id = %id, "Password change rejected: old password mismatch");
            return Err(UserError::InvalidPassword);
        }

        user.password_hash = self
            .password_hasher
            .hash(command.new_password.expose())
            .map_err(|e| UserError::Internal(format!("Password hashing failed: {}", e)))?;

        self.repository.update(user).await?;
        tracing::info!(user_id = %id, "Password changed");

        Ok(())
    }

    async fn list_users(
        &self,
        filter: UserFilter,
        page: PageRequest,
    ) -> Result<UserPage, UserError> {
        let (items, total) = self.repository.list(&filter, &page).await?;
        Ok(UserPage::new(items, total, page))
    }
}
