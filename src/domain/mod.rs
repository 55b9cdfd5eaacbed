//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! clinic concepts independent of infrastructure concerns.

pub mod appointment;
pub mod doctor;
pub mod password;
pub mod pet;
pub mod user;

pub use appointment::{Appointment, NewAppointment};
pub use doctor::{Doctor, NewDoctor};
pub use password::{Argon2Hasher, CredentialHasher, HashedPassword};
pub use pet::{NewPet, Pet};
pub use user::{
    normalize_email, NewUser, User, UserChanges, UserCredentials, UserResponse, UserRole,
    UserStatus,
};
