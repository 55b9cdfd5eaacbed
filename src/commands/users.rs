//! Users command - Account role management for operators.
//!
//! The admin-only HTTP routes need at least one admin; `users promote`
//! creates the first one.

use crate::cli::args::{UsersAction, UsersArgs};
use crate::config::Config;
use crate::domain::{normalize_email, User, UserChanges, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, UserRepository, UserStore};

/// Execute the users command
pub async fn execute(args: UsersArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let users = UserStore::new(db.get_connection());

    let (email, role) = match args.action {
        UsersAction::Promote { email } => (email, UserRole::Admin),
        UsersAction::Demote { email } => (email, UserRole::Client),
    };

    let user = assign_role(&users, &email, role).await?;
    println!("{}: {}", user.email, user.role);
    Ok(())
}

/// Set the role of the account registered under `email`.
pub async fn assign_role(
    users: &dyn UserRepository,
    email: &str,
    role: UserRole,
) -> AppResult<User> {
    let email = normalize_email(email);
    let user = users
        .find_by_email(&email)
        .await?
        .ok_or(AppError::NotFound)?;

    if user.role == role {
        tracing::info!(user_id = %user.id, %role, "Role unchanged");
        return Ok(user);
    }

    let user = users
        .update(
            user.id,
            UserChanges {
                role: Some(role),
                ..Default::default()
            },
        )
        .await?;
    tracing::info!(user_id = %user.id, %role, "Role assigned");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    use crate::domain::UserStatus;
    use crate::infra::MockUserRepository;

    fn client(email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Ana".to_string(),
            email: email.to_string(),
            phone: None,
            role: UserRole::Client,
            status: UserStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_promote_normalizes_email_and_sets_admin() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .withf(|email| email == "ana@x.com")
            .returning(|email| Ok(Some(client(email))));
        repo.expect_update()
            .withf(|_, changes| changes.role == Some(UserRole::Admin) && changes.email.is_none())
            .returning(|id, _| {
                let mut user = client("ana@x.com");
                user.id = id;
                user.role = UserRole::Admin;
                Ok(user)
            });

        let user = assign_role(&repo, " Ana@X.com ", UserRole::Admin).await.unwrap();
        assert_eq!(user.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn test_unknown_email_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_update().never();

        let result = assign_role(&repo, "ghost@x.com", UserRole::Admin).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_same_role_skips_update() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(client(email))));
        repo.expect_update().never();

        let user = assign_role(&repo, "ana@x.com", UserRole::Client).await.unwrap();
        assert_eq!(user.role, UserRole::Client);
    }
}
