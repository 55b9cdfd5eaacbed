//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    appointment_handler, auth_handler, doctor_handler, pet_handler, user_handler,
};
use crate::domain::{Appointment, Doctor, Pet, UserResponse, UserRole, UserStatus};
use crate::types::FieldError;

/// OpenAPI documentation for the Vet Clinic API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vet Clinic API",
        version = "0.1.0",
        description = "Accounts, sessions and clinic records for a veterinary practice"
    ),
    servers(
        (url = "http://localhost:3001", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        auth_handler::get_profile,
        auth_handler::update_profile,
        auth_handler::refresh_token,
        auth_handler::logout,
        // User endpoints
        user_handler::list_users,
        user_handler::get_user,
        user_handler::update_user,
        user_handler::delete_user,
        // Clinic records
        pet_handler::list_pets,
        pet_handler::create_pet,
        doctor_handler::list_doctors,
        doctor_handler::create_doctor,
        appointment_handler::list_appointments,
        appointment_handler::create_appointment,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserStatus,
            UserResponse,
            Pet,
            Doctor,
            Appointment,
            FieldError,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::UpdateProfileRequest,
            auth_handler::AuthData,
            auth_handler::TokenData,
            // Request bodies
            user_handler::UpdateUserRequest,
            pet_handler::CreatePetRequest,
            doctor_handler::CreateDoctorRequest,
            appointment_handler::CreateAppointmentRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and session tokens"),
        (name = "Users", description = "User administration"),
        (name = "Pets", description = "Pet records"),
        (name = "Doctors", description = "Clinic staff"),
        (name = "Appointments", description = "Visit booking")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
