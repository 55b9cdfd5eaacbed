//! Pet records.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// A pet registered at the clinic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Pet {
    pub id: Uuid,
    #[schema(example = "Luna")]
    pub name: String,
    #[schema(example = "dog")]
    pub species: String,
    #[schema(example = "Border Collie")]
    pub breed: Option<String>,
    /// Owning user
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new pet row.
#[derive(Debug, Clone)]
pub struct NewPet {
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub owner_id: Uuid,
}
