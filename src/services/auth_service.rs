//! Authentication service - registration, login, profile and session tokens.
//!
//! Depends only on the credential store, hasher and token issuer traits, all
//! injected through the constructor.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::token_issuer::{Claims, IssuedToken, TokenIssuer};
use crate::domain::{
    normalize_email, CredentialHasher, HashedPassword, NewUser, User, UserChanges,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// Registration input. Field shape is validated by the HTTP layer.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

/// Self-service profile changes.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    /// An empty string clears the phone number
    pub phone: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Result of register/login: the user (no secret) plus a token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: IssuedToken,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user and sign them in
    async fn register(&self, registration: Registration) -> AppResult<AuthSession>;

    /// Check credentials and issue a token
    async fn login(&self, email: &str, password: &str) -> AppResult<AuthSession>;

    /// Load the authenticated user's profile
    async fn get_profile(&self, user_id: Uuid) -> AppResult<User>;

    /// Update the authenticated user's profile, optionally changing the password
    async fn update_profile(&self, user_id: Uuid, update: ProfileUpdate) -> AppResult<User>;

    /// Issue a new token. The old one stays valid until it expires.
    async fn refresh_token(&self, user_id: Uuid, email: &str) -> AppResult<IssuedToken>;

    /// Sessions are stateless; the client discards its token.
    async fn logout(&self, user_id: Uuid) -> AppResult<()>;

    /// Verify a bearer token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn CredentialHasher>,
    issuer: Arc<dyn TokenIssuer>,
}

impl Authenticator {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn CredentialHasher>,
        issuer: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            users,
            hasher,
            issuer,
        }
    }

    /// Hash on the blocking pool; Argon2 is deliberately slow.
    async fn hash_password(&self, password: &str) -> AppResult<HashedPassword> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::internal(format!("Hashing task failed: {}", e)))?
    }

    /// Verify on the blocking pool. With no stored hash a decoy is checked
    /// instead, and the result is always `false`.
    async fn verify_password(
        &self,
        password: &str,
        hash: Option<HashedPassword>,
    ) -> AppResult<bool> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        tokio::task::spawn_blocking(move || match hash {
            Some(hash) => hasher.verify(&password, &hash),
            None => hasher.verify_decoy(&password),
        })
        .await
        .map_err(|e| AppError::internal(format!("Verification task failed: {}", e)))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, registration: Registration) -> AppResult<AuthSession> {
        let email = normalize_email(&registration.email);

        // Fast path only; the unique index decides races and also yields Conflict
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email"));
        }

        let password_hash = self.hash_password(&registration.password).await?;
        let user = self
            .users
            .create(NewUser {
                name: registration.name.trim().to_string(),
                email,
                phone: registration
                    .phone
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty()),
                password_hash,
            })
            .await?;

        let token = self.issuer.issue(user.id, &user.email)?;
        tracing::info!(user_id = %user.id, "User registered");

        Ok(AuthSession { user, token })
    }

    async fn login(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let email = normalize_email(email);
        let credentials = self.users.find_by_email_with_secret(&email).await?;

        let stored_hash = credentials.as_ref().map(|c| c.password_hash.clone());
        let password_valid = self.verify_password(password, stored_hash).await?;

        // Unknown email and wrong password must be indistinguishable
        let user = match credentials {
            Some(credentials) if password_valid => credentials.user,
            _ => {
                tracing::info!("Login rejected");
                return Err(AppError::InvalidCredentials);
            }
        };

        let token = self.issuer.issue(user.id, &user.email)?;
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthSession { user, token })
    }

    async fn get_profile(&self, user_id: Uuid) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn update_profile(&self, user_id: Uuid, update: ProfileUpdate) -> AppResult<User> {
        let existing = self
            .users
            .find_by_id_with_secret(user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let name = match update.name.map(|n| n.trim().to_string()) {
            Some(name) if name.is_empty() => {
                return Err(AppError::bad_request("Name cannot be empty"));
            }
            name => name,
        };

        let mut changes = UserChanges {
            name,
            phone: update.phone.map(|p| {
                let p = p.trim().to_string();
                (!p.is_empty()).then_some(p)
            }),
            ..Default::default()
        };

        if let Some(new_password) = non_empty(update.new_password) {
            let current_password = non_empty(update.current_password).ok_or_else(|| {
                AppError::bad_request("Current password is required to set a new password")
            })?;

            let valid = self
                .verify_password(&current_password, Some(existing.password_hash.clone()))
                .await?;
            if !valid {
                return Err(AppError::InvalidCredentials);
            }

            changes.password_hash = Some(self.hash_password(&new_password).await?);
        }

        if let Some(email) = update.email {
            let email = normalize_email(&email);
            if email != existing.user.email {
                if let Some(other) = self.users.find_by_email(&email).await? {
                    if other.id != user_id {
                        return Err(AppError::conflict("Email"));
                    }
                }
                changes.email = Some(email);
            }
        }

        if changes.is_empty() {
            return Ok(existing.user);
        }

        let user = self.users.update(user_id, changes).await?;
        tracing::info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }

    async fn refresh_token(&self, user_id: Uuid, email: &str) -> AppResult<IssuedToken> {
        self.issuer.issue(user_id, email)
    }

    async fn logout(&self, user_id: Uuid) -> AppResult<()> {
        tracing::info!(user_id = %user_id, "User logged out");
        Ok(())
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        self.issuer.verify(token).map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mockall::predicate::eq;

    use crate::config::{AuthSettings, HashingSettings};
    use crate::domain::{Argon2Hasher, UserCredentials, UserRole, UserStatus};
    use crate::infra::MockUserRepository;
    use crate::services::JwtIssuer;

    fn hasher() -> Arc<Argon2Hasher> {
        Arc::new(
            Argon2Hasher::new(HashingSettings {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            })
            .unwrap(),
        )
    }

    fn issuer() -> Arc<JwtIssuer> {
        let settings = AuthSettings::new("test-secret-key-for-testing-only-32chars", "24h").unwrap();
        Arc::new(JwtIssuer::new(&settings))
    }

    fn user(id: Uuid, email: &str) -> User {
        User {
            id,
            name: "Ana".to_string(),
            email: email.to_string(),
            phone: None,
            role: UserRole::Client,
            status: UserStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(repo: MockUserRepository) -> Authenticator {
        Authenticator::new(Arc::new(repo), hasher(), issuer())
    }

    #[tokio::test]
    async fn test_register_normalizes_email_before_lookup_and_create() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .withf(|email| email == "ana@x.com")
            .returning(|_| Ok(None));
        repo.expect_create()
            .withf(|new_user| new_user.email == "ana@x.com" && new_user.name == "Ana")
            .returning(|new_user| Ok(user(Uuid::new_v4(), &new_user.email)));

        let session = service(repo)
            .register(Registration {
                name: "Ana".into(),
                email: "Ana@X.com ".into(),
                phone: None,
                password: "Pw123!".into(),
            })
            .await
            .unwrap();

        assert_eq!(session.user.email, "ana@x.com");
        assert_eq!(session.token.expires_in, "24h");
    }

    #[tokio::test]
    async fn test_register_existing_email_conflicts_without_create() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(user(Uuid::new_v4(), email))));
        repo.expect_create().never();

        let result = service(repo)
            .register(Registration {
                name: "Ana".into(),
                email: "ana@x.com".into(),
                phone: None,
                password: "Pw123!".into(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_store_conflict_is_authoritative() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create()
            .returning(|_| Err(AppError::conflict("Email")));

        let result = service(repo)
            .register(Registration {
                name: "Ana".into(),
                email: "ana@x.com".into(),
                phone: None,
                password: "Pw123!".into(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_invalid_credentials() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email_with_secret()
            .returning(|_| Ok(None));

        let result = service(repo).login("nobody@x.com", "Pw123!").await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_invalid_credentials() {
        let hasher = hasher();
        let hash = hasher.hash("Pw123!").unwrap();
        let id = Uuid::new_v4();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email_with_secret()
            .returning(move |email| {
                Ok(Some(UserCredentials {
                    user: user(id, email),
                    password_hash: hash.clone(),
                }))
            });

        let service = Authenticator::new(Arc::new(repo), hasher, issuer());
        let result = service.login("ana@x.com", "wrong").await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_get_profile_missing_user_is_not_found() {
        let id = Uuid::new_v4();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .with(eq(id))
            .returning(|_| Ok(None));

        let result = service(repo).get_profile(id).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_profile_new_password_requires_current() {
        let hasher = hasher();
        let hash = hasher.hash("Pw123!").unwrap();
        let id = Uuid::new_v4();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id_with_secret().returning(move |id| {
            Ok(Some(UserCredentials {
                user: user(id, "ana@x.com"),
                password_hash: hash.clone(),
            }))
        });
        repo.expect_update().never();

        let service = Authenticator::new(Arc::new(repo), hasher, issuer());
        let result = service
            .update_profile(
                id,
                ProfileUpdate {
                    new_password: Some("NewPw456!".into()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_update_profile_blank_name_is_rejected() {
        let hasher = hasher();
        let hash = hasher.hash("Pw123!").unwrap();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id_with_secret().returning(move |id| {
            Ok(Some(UserCredentials {
                user: user(id, "ana@x.com"),
                password_hash: hash.clone(),
            }))
        });
        repo.expect_update().never();

        let service = Authenticator::new(Arc::new(repo), hasher, issuer());
        let result = service
            .update_profile(
                Uuid::new_v4(),
                ProfileUpdate {
                    name: Some("   ".into()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_update_profile_email_taken_by_other_user_conflicts() {
        let hasher = hasher();
        let hash = hasher.hash("Pw123!").unwrap();
        let id = Uuid::new_v4();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id_with_secret().returning(move |id| {
            Ok(Some(UserCredentials {
                user: user(id, "ana@x.com"),
                password_hash: hash.clone(),
            }))
        });
        repo.expect_find_by_email()
            .withf(|email| email == "bob@x.com")
            .returning(|email| Ok(Some(user(Uuid::new_v4(), email))));
        repo.expect_update().never();

        let service = Authenticator::new(Arc::new(repo), hasher, issuer());
        let result = service
            .update_profile(
                id,
                ProfileUpdate {
                    email: Some(" BOB@x.com".into()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_profile_applies_all_changes_in_one_call() {
        let hasher = hasher();
        let hash = hasher.hash("Pw123!").unwrap();
        let id = Uuid::new_v4();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id_with_secret().returning(move |id| {
            Ok(Some(UserCredentials {
                user: user(id, "ana@x.com"),
                password_hash: hash.clone(),
            }))
        });
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_update()
            .times(1)
            .withf(|_, changes| {
                changes.name.as_deref() == Some("Ana Maria")
                    && changes.email.as_deref() == Some("ana.maria@x.com")
                    && changes.phone == Some(None)
                    && changes.password_hash.is_some()
            })
            .returning(|id, changes| {
                let mut updated = user(id, changes.email.as_deref().unwrap_or("ana@x.com"));
                updated.name = changes.name.unwrap_or_default();
                Ok(updated)
            });

        let service = Authenticator::new(Arc::new(repo), hasher, issuer());
        let updated = service
            .update_profile(
                id,
                ProfileUpdate {
                    name: Some("Ana Maria".into()),
                    email: Some("Ana.Maria@x.com".into()),
                    phone: Some(String::new()),
                    current_password: Some("Pw123!".into()),
                    new_password: Some("NewPw456!".into()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.email, "ana.maria@x.com");
        assert_eq!(updated.name, "Ana Maria");
    }

    #[tokio::test]
    async fn test_refresh_token_embeds_identity() {
        let service = service(MockUserRepository::new());
        let id = Uuid::new_v4();

        let issued = service.refresh_token(id, "ana@x.com").await.unwrap();
        let claims = service.verify_token(&issued.token).unwrap();

        assert_eq!(claims.sub, id);
        assert_eq!(claims.email, "ana@x.com");
    }

    #[tokio::test]
    async fn test_verify_token_maps_to_token_error() {
        let service = service(MockUserRepository::new());
        let result = service.verify_token("garbage");
        assert!(matches!(result, Err(AppError::Token(_))));
    }
}
