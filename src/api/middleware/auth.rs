//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::User;
use crate::errors::{AppError, AppResult};

/// Authenticated user extracted from JWT token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

/// JWT authentication middleware.
///
/// Extracts and validates the JWT token from the Authorization header,
/// then injects the CurrentUser into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let claims = state.auth_service.verify_token(token)?;

    let current_user = CurrentUser {
        id: claims.sub,
        email: claims.email,
    };

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

/// Require admin role, returns Forbidden error if not admin.
///
/// Roles are not carried in the token, so the account is looked up.
pub async fn require_admin(state: &AppState, user: &CurrentUser) -> AppResult<User> {
    let account = match state.user_service.get_user(user.id).await {
        Ok(account) => account,
        Err(AppError::NotFound) => return Err(AppError::Unauthorized),
        Err(e) => return Err(e),
    };

    if account.is_admin() {
        Ok(account)
    } else {
        tracing::debug!(user_id = %user.id, "Non-admin denied");
        Err(AppError::Forbidden)
    }
}

/// Allow the account owner, or an administrator.
pub async fn require_self_or_admin(
    state: &AppState,
    user: &CurrentUser,
    target: Uuid,
) -> AppResult<()> {
    if user.id == target {
        return Ok(());
    }
    require_admin(state, user).await.map(|_| ())
}
