//! Doctor handlers.

use axum::{extract::State, routing::get, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{trimmed, ValidatedJson};
use crate::api::AppState;
use crate::domain::{Doctor, NewDoctor};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

/// New doctor request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDoctorRequest {
    #[serde(deserialize_with = "trimmed::trimmed")]
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Dr. Elena Ruiz")]
    pub name: String,
    #[serde(deserialize_with = "trimmed::trimmed")]
    #[validate(length(min = 1, message = "Specialty is required"))]
    #[schema(example = "surgery")]
    pub specialty: String,
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "trimmed::trimmed_option")]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

pub fn doctor_routes() -> Router<AppState> {
    Router::new().route("/", get(list_doctors).post(create_doctor))
}

/// List all doctors
#[utoipa::path(
    get,
    path = "/api/v1/doctors",
    tag = "Doctors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of doctors", body = Vec<Doctor>),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_doctors(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<Doctor>>> {
    let doctors = state.clinic_service.list_doctors().await?;
    Ok(ApiResponse::success(doctors, "Doctors retrieved successfully"))
}

/// Add a doctor
#[utoipa::path(
    post,
    path = "/api/v1/doctors",
    tag = "Doctors",
    security(("bearer_auth" = [])),
    request_body = CreateDoctorRequest,
    responses(
        (status = 201, description = "Doctor created", body = Doctor),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn create_doctor(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateDoctorRequest>,
) -> AppResult<Created<Doctor>> {
    let doctor = state
        .clinic_service
        .create_doctor(NewDoctor {
            name: payload.name,
            specialty: payload.specialty,
            phone: payload.phone,
            email: payload.email,
        })
        .await?;

    Ok(Created::new(doctor, "Doctor created successfully"))
}
