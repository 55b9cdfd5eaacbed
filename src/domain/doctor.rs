//! Doctor records.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// A veterinarian working at the clinic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Doctor {
    pub id: Uuid,
    #[schema(example = "Dr. Elena Ruiz")]
    pub name: String,
    #[schema(example = "surgery")]
    pub specialty: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// `active` or `inactive`
    #[schema(example = "active")]
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new doctor row. New doctors always start `active`.
#[derive(Debug, Clone)]
pub struct NewDoctor {
    pub name: String,
    pub specialty: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}
