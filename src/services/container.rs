//! Service Container - Centralized service access.
//!
//! Wires repositories, the password hasher and the token issuer into the
//! application services once at startup.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, ClinicManager, ClinicService, JwtIssuer, UserManager, UserService,
};
use crate::config::Config;
use crate::domain::Argon2Hasher;
use crate::errors::AppResult;
use crate::infra::{ClinicStore, UserStore};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    /// Get clinic records service
    fn clinic(&self) -> Arc<dyn ClinicService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    clinic_service: Arc<dyn ClinicService>,
}

impl Services {
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        clinic_service: Arc<dyn ClinicService>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            clinic_service,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: &Config) -> AppResult<Self> {
        let users = Arc::new(UserStore::new(db.clone()));
        let records = Arc::new(ClinicStore::new(db));
        let hasher = Arc::new(Argon2Hasher::new(config.hashing)?);
        let issuer = Arc::new(JwtIssuer::new(&config.auth));

        Ok(Self {
            auth_service: Arc::new(Authenticator::new(users.clone(), hasher, issuer)),
            user_service: Arc::new(UserManager::new(users)),
            clinic_service: Arc::new(ClinicManager::new(records)),
        })
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn clinic(&self) -> Arc<dyn ClinicService> {
        self.clinic_service.clone()
    }
}
