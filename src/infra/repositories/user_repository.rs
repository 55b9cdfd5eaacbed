//! User repository - the credential store.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::config::{ROLE_CLIENT, STATUS_ACTIVE};
use crate::domain::{NewUser, User, UserChanges, UserCredentials};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Emails passed in must already be normalized. Only the `*_with_secret`
/// lookups return the stored hash.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by ID together with the stored hash
    async fn find_by_id_with_secret(&self, id: Uuid) -> AppResult<Option<UserCredentials>>;

    /// Find user by normalized email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find user by normalized email together with the stored hash
    async fn find_by_email_with_secret(&self, email: &str)
        -> AppResult<Option<UserCredentials>>;

    /// Create a new user with the default role and status.
    ///
    /// Fails with `Conflict` when the email is already taken.
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    /// Apply changes to a user in one write
    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User>;

    /// Permanently delete a user
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// List all users, newest first
    async fn list(&self) -> AppResult<Vec<User>>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)
    }
}

/// The unique index on `users.email` is the authoritative uniqueness check.
fn map_write_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict("Email"),
        _ => AppError::from(err),
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_id_with_secret(&self, id: Uuid) -> AppResult<Option<UserCredentials>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(UserCredentials::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.find_model_by_email(email).await?.map(User::from))
    }

    async fn find_by_email_with_secret(
        &self,
        email: &str,
    ) -> AppResult<Option<UserCredentials>> {
        Ok(self
            .find_model_by_email(email)
            .await?
            .map(UserCredentials::from))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new_user.name),
            email: Set(new_user.email),
            phone: Set(new_user.phone),
            role: Set(ROLE_CLIENT.to_string()),
            status: Set(STATUS_ACTIVE.to_string()),
            password_hash: Set(new_user.password_hash.into_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(map_write_error)?;
        Ok(User::from(model))
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        let user = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = user.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(phone) = changes.phone {
            active.phone = Set(phone);
        }
        if let Some(hash) = changes.password_hash {
            active.password_hash = Set(hash.into_string());
        }
        if let Some(role) = changes.role {
            active.role = Set(role.to_string());
        }
        if let Some(status) = changes.status {
            active.status = Set(status.to_string());
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(map_write_error)?;
        Ok(User::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|err| match err.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    AppError::bad_request("User still owns pets or appointments")
                }
                _ => AppError::from(err),
            })?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_desc(user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }
}
