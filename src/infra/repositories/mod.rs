//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod clinic_repository;
pub(crate) mod entities;
mod user_repository;

pub use clinic_repository::{ClinicRepository, ClinicStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use clinic_repository::MockClinicRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
