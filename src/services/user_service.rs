//! User service - Administrative user management.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{normalize_email, User, UserChanges, UserRole, UserStatus};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UserRepository;

/// Fields an administrator may change on any account.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
}

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// List all users, newest first
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Update user details, including role and status
    async fn update_user(&self, id: Uuid, update: UserUpdate) -> AppResult<User>;

    /// Permanently delete a user
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserService.
pub struct UserManager {
    users: Arc<dyn UserRepository>,
}

impl UserManager {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.users.find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.users.list().await
    }

    async fn update_user(&self, id: Uuid, update: UserUpdate) -> AppResult<User> {
        let existing = self.users.find_by_id(id).await?.ok_or_not_found()?;

        let mut changes = UserChanges {
            name: update
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            phone: update.phone.map(|p| {
                let p = p.trim().to_string();
                (!p.is_empty()).then_some(p)
            }),
            role: update.role,
            status: update.status,
            ..Default::default()
        };

        if let Some(email) = update.email {
            let email = normalize_email(&email);
            if email != existing.email {
                if let Some(other) = self.users.find_by_email(&email).await? {
                    if other.id != id {
                        return Err(AppError::conflict("Email"));
                    }
                }
                changes.email = Some(email);
            }
        }

        if changes.is_empty() {
            return Ok(existing);
        }

        let user = self.users.update(id, changes).await?;
        tracing::info!(user_id = %id, role = %user.role, status = %user.status, "User updated");
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        self.users.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}
