//! API layer - HTTP surface under `/api/v1`.
//!
//! Handlers translate JSON bodies into service calls and wrap results in the
//! response envelope. Bearer tokens are checked by `middleware::auth_middleware`.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
