//! Authentication handlers.

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{trimmed, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::UserResponse;
use crate::errors::AppResult;
use crate::services::{AuthSession, IssuedToken, ProfileUpdate, Registration};
use crate::types::{ApiResponse, Created};

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// User display name
    #[serde(deserialize_with = "trimmed::trimmed")]
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Ana Perez")]
    pub name: String,
    /// User email address, matched case-insensitively
    #[serde(deserialize_with = "trimmed::trimmed")]
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "ana@example.com")]
    pub email: String,
    /// Contact phone
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    #[schema(example = "+34 600 000 000")]
    pub phone: Option<String>,
    /// User password
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// User email address, matched case-insensitively
    #[serde(deserialize_with = "trimmed::trimmed")]
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "ana@example.com")]
    pub email: String,
    /// User password
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Profile update request. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "trimmed::trimmed_option")]
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "trimmed::trimmed_option")]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    /// An empty string clears the phone number
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,
    /// Required when `newPassword` is set
    pub current_password: Option<String>,
    #[validate(length(min = 1, message = "New password cannot be empty"))]
    pub new_password: Option<String>,
}

/// Signed-in user with a session token
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub user: UserResponse,
    pub token: String,
    #[schema(example = "24h")]
    pub expires_in: String,
}

impl From<AuthSession> for AuthData {
    fn from(session: AuthSession) -> Self {
        Self {
            user: UserResponse::from(session.user),
            token: session.token.token,
            expires_in: session.token.expires_in,
        }
    }
}

/// A freshly issued token
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenData {
    pub token: String,
    #[schema(example = "24h")]
    pub expires_in: String,
}

impl From<IssuedToken> for TokenData {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            expires_in: issued.expires_in,
        }
    }
}

/// Public authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Authentication routes that require a bearer token
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/refresh-token", post(refresh_token))
        .route("/logout", post(logout))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthData),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<AuthData>> {
    let session = state
        .auth_service
        .register(Registration {
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            password: payload.password,
        })
        .await?;

    Ok(Created::new(
        AuthData::from(session),
        "User registered successfully",
    ))
}

/// Login and get JWT token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthData),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<ApiResponse<AuthData>> {
    let session = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(ApiResponse::success(AuthData::from(session), "Login successful"))
}

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/v1/auth/profile",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile retrieved", body = UserResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User no longer exists")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.auth_service.get_profile(current_user.id).await?;
    Ok(ApiResponse::success(
        UserResponse::from(user),
        "Profile retrieved successfully",
    ))
}

/// Update the authenticated user's profile
#[utoipa::path(
    put,
    path = "/api/v1/auth/profile",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error or current password missing"),
        (status = 401, description = "Invalid token or wrong current password"),
        (status = 404, description = "User no longer exists"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state
        .auth_service
        .update_profile(
            current_user.id,
            ProfileUpdate {
                name: payload.name,
                email: payload.email,
                phone: payload.phone,
                current_password: payload.current_password,
                new_password: payload.new_password,
            },
        )
        .await?;

    Ok(ApiResponse::success(
        UserResponse::from(user),
        "Profile updated successfully",
    ))
}

/// Issue a new token for the authenticated user
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh-token",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Token refreshed", body = TokenData),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<ApiResponse<TokenData>> {
    let issued = state
        .auth_service
        .refresh_token(current_user.id, &current_user.email)
        .await?;

    Ok(ApiResponse::success(
        TokenData::from(issued),
        "Token refreshed successfully",
    ))
}

/// End the session on the client side
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged out"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<ApiResponse<()>> {
    state.auth_service.logout(current_user.id).await?;
    Ok(ApiResponse::message(
        "Logged out successfully. Discard the token on the client",
    ))
}
