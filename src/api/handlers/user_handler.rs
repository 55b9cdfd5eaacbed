//! User administration handlers.

use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::api::extractors::{trimmed, ValidatedJson};
use crate::api::middleware::{require_admin, require_self_or_admin, CurrentUser};
use crate::api::AppState;
use crate::config::{is_valid_role, is_valid_status};
use crate::domain::{UserResponse, UserRole, UserStatus};
use crate::errors::AppResult;
use crate::services::UserUpdate;
use crate::types::ApiResponse;

fn validate_role(role: &str) -> Result<(), ValidationError> {
    if is_valid_role(role) {
        Ok(())
    } else {
        Err(ValidationError::new("role").with_message("Role must be client or admin".into()))
    }
}

fn validate_status(status: &str) -> Result<(), ValidationError> {
    if is_valid_status(status) {
        Ok(())
    } else {
        Err(ValidationError::new("status")
            .with_message("Status must be active or inactive".into()))
    }
}

/// Administrative user update. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "trimmed::trimmed_option")]
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "trimmed::trimmed_option")]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,
    #[validate(custom(function = "validate_role"))]
    #[schema(example = "admin")]
    pub role: Option<String>,
    #[validate(custom(function = "validate_status"))]
    #[schema(example = "inactive")]
    pub status: Option<String>,
}

/// Create user administration routes (bearer token required)
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// List all users (admin only)
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of users", body = Vec<UserResponse>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    require_admin(&state, &current_user).await?;

    let users = state.user_service.list_users().await?;
    Ok(ApiResponse::success(
        users.into_iter().map(UserResponse::from).collect(),
        "Users retrieved successfully",
    ))
}

/// Get a user by id (the user themselves or an admin)
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 403, description = "Not the owner and not an admin"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<UserResponse>> {
    require_self_or_admin(&state, &current_user, id).await?;

    let user = state.user_service.get_user(id).await?;
    Ok(ApiResponse::success(
        UserResponse::from(user),
        "User retrieved successfully",
    ))
}

/// Update a user, including role and status (admin only)
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    require_admin(&state, &current_user).await?;

    let user = state
        .user_service
        .update_user(
            id,
            UserUpdate {
                name: payload.name,
                email: payload.email,
                phone: payload.phone,
                role: payload.role.as_deref().map(UserRole::from),
                status: payload.status.as_deref().map(UserStatus::from),
            },
        )
        .await?;

    Ok(ApiResponse::success(
        UserResponse::from(user),
        "User updated successfully",
    ))
}

/// Delete a user (admin only)
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 400, description = "User still has pets or appointments"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    require_admin(&state, &current_user).await?;

    state.user_service.delete_user(id).await?;
    Ok(ApiResponse::message("User deleted successfully"))
}
