//! Appointment handlers.

use axum::{extract::State, routing::get, Router};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Appointment, NewAppointment};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

/// New appointment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAppointmentRequest {
    pub user_id: Uuid,
    pub pet_id: Uuid,
    pub doctor_id: Uuid,
    #[schema(value_type = String, example = "2026-03-14")]
    pub date: NaiveDate,
    #[schema(value_type = String, example = "10:30:00")]
    pub time: NaiveTime,
    #[validate(length(max = 500, message = "Reason must be at most 500 characters"))]
    #[schema(example = "Annual vaccination")]
    pub reason: Option<String>,
}

pub fn appointment_routes() -> Router<AppState> {
    Router::new().route("/", get(list_appointments).post(create_appointment))
}

/// List all appointments
#[utoipa::path(
    get,
    path = "/api/v1/appointments",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of appointments", body = Vec<Appointment>),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_appointments(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<Appointment>>> {
    let appointments = state.clinic_service.list_appointments().await?;
    Ok(ApiResponse::success(
        appointments,
        "Appointments retrieved successfully",
    ))
}

/// Book an appointment
#[utoipa::path(
    post,
    path = "/api/v1/appointments",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Appointment booked", body = Appointment),
        (status = 400, description = "Validation error or unknown user, pet or doctor"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn create_appointment(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateAppointmentRequest>,
) -> AppResult<Created<Appointment>> {
    let appointment = state
        .clinic_service
        .create_appointment(NewAppointment {
            user_id: payload.user_id,
            pet_id: payload.pet_id,
            doctor_id: payload.doctor_id,
            date: payload.date,
            time: payload.time,
            reason: payload.reason,
        })
        .await?;

    Ok(Created::new(appointment, "Appointment booked successfully"))
}
