//! Pet handlers.

use axum::{extract::State, routing::get, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{trimmed, ValidatedJson};
use crate::api::AppState;
use crate::domain::{NewPet, Pet};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

/// New pet request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePetRequest {
    #[serde(deserialize_with = "trimmed::trimmed")]
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Luna")]
    pub name: String,
    #[serde(deserialize_with = "trimmed::trimmed")]
    #[validate(length(min = 1, message = "Species is required"))]
    #[schema(example = "dog")]
    pub species: String,
    #[schema(example = "Border Collie")]
    pub breed: Option<String>,
    /// Owning user
    pub owner_id: Uuid,
}

pub fn pet_routes() -> Router<AppState> {
    Router::new().route("/", get(list_pets).post(create_pet))
}

/// List all pets
#[utoipa::path(
    get,
    path = "/api/v1/pets",
    tag = "Pets",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of pets", body = Vec<Pet>),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_pets(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<Pet>>> {
    let pets = state.clinic_service.list_pets().await?;
    Ok(ApiResponse::success(pets, "Pets retrieved successfully"))
}

/// Register a pet
#[utoipa::path(
    post,
    path = "/api/v1/pets",
    tag = "Pets",
    security(("bearer_auth" = [])),
    request_body = CreatePetRequest,
    responses(
        (status = 201, description = "Pet created", body = Pet),
        (status = 400, description = "Validation error or unknown owner"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn create_pet(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreatePetRequest>,
) -> AppResult<Created<Pet>> {
    let pet = state
        .clinic_service
        .create_pet(NewPet {
            name: payload.name,
            species: payload.species,
            breed: payload.breed,
            owner_id: payload.owner_id,
        })
        .await?;

    Ok(Created::new(pet, "Pet created successfully"))
}
