//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

mod auth_service;
mod clinic_service;
pub mod container;
mod token_issuer;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, AuthSession, Authenticator, ProfileUpdate, Registration};
pub use clinic_service::{ClinicManager, ClinicService};
pub use token_issuer::{Claims, IssuedToken, JwtIssuer, TokenError, TokenIssuer};
pub use user_service::{UserManager, UserService, UserUpdate};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
