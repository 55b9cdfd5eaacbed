//! HTTP request handlers.

pub mod appointment_handler;
pub mod auth_handler;
pub mod doctor_handler;
pub mod pet_handler;
pub mod user_handler;

pub use appointment_handler::appointment_routes;
pub use auth_handler::{auth_routes, session_routes};
pub use doctor_handler::doctor_routes;
pub use pet_handler::pet_routes;
pub use user_handler::user_routes;
