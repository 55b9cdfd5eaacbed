//! Appointment records.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// A booked visit. References rows by id only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub pet_id: Uuid,
    pub doctor_id: Uuid,
    #[schema(value_type = String, example = "2026-03-14")]
    pub date: NaiveDate,
    #[schema(value_type = String, example = "10:30:00")]
    pub time: NaiveTime,
    #[schema(example = "Annual vaccination")]
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new appointment row.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub user_id: Uuid,
    pub pet_id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub reason: Option<String>,
}
