//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod appointment;
pub mod doctor;
pub mod pet;
pub mod user;
