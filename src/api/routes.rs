//! Application route configuration.

use axum::{extract::State, http::StatusCode, middleware, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    appointment_routes, auth_routes, doctor_routes, pet_routes, session_routes, user_routes,
};
use super::middleware::auth_middleware;
use super::openapi::ApiDoc;
use super::AppState;
use crate::config::API_PREFIX;
use crate::errors::AppError;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let require_token = || middleware::from_fn_with_state(state.clone(), auth_middleware);

    let api = Router::new()
        .route("/", get(api_index))
        // Public registration/login, token-protected session routes
        .nest(
            "/auth",
            auth_routes().merge(session_routes().route_layer(require_token())),
        )
        .nest("/users", user_routes().route_layer(require_token()))
        .nest("/pets", pet_routes().route_layer(require_token()))
        .nest("/doctors", doctor_routes().route_layer(require_token()))
        .nest(
            "/appointments",
            appointment_routes().route_layer(require_token()),
        );

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest(API_PREFIX, api)
        .fallback(not_found)
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Vet Clinic API"
}

/// Resource roots under the API prefix
#[derive(Serialize)]
struct ApiIndex {
    name: &'static str,
    version: &'static str,
    endpoints: Vec<String>,
}

async fn api_index() -> Json<ApiIndex> {
    let endpoints = ["auth", "users", "pets", "doctors", "appointments"]
        .iter()
        .map(|resource| format!("{}/{}", API_PREFIX, resource))
        .collect();

    Json(ApiIndex {
        name: "Vet Clinic API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints,
    })
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: ServiceStatus,
}

/// Service status
#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint with database connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.database.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                database: ServiceStatus {
                    status: "healthy",
                    error: None,
                },
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded",
                    database: ServiceStatus {
                        status: "unhealthy",
                        error: Some("Database unreachable".to_string()),
                    },
                }),
            )
        }
    }
}

async fn not_found() -> AppError {
    AppError::NotFound
}
