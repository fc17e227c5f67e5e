//! API route configuration.

use crate::api::docs::openapi_json;
use crate::api::handlers::{health_handler, index_handler, redirect_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Public routes.
///
/// # Endpoints
///
/// - `GET  /`        - Service banner
/// - `GET  /health`  - Store connectivity check
/// - `POST /shorten` - Shorten a long URL
/// - `GET  /api-docs` - OpenAPI document (also at `/api-docs/openapi.json`)
/// - `GET  /{code}`  - Redirect to the long URL
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/shorten", post(shorten_handler))
        .route("/api-docs", get(openapi_json))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/{code}", get(redirect_handler))
}
