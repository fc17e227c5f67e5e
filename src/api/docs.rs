//! OpenAPI document for the HTTP API.

use axum::Json;
use utoipa::OpenApi;

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::api::dto::shorten::{ShortenCreated, ShortenExisting, ShortenRequest};
use crate::api::handlers;
use crate::error::ErrorBody;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "URL Shortener API",
        description = "Issues short codes for long URLs and redirects them back"
    ),
    paths(
        handlers::shorten::shorten_handler,
        handlers::redirect::redirect_handler,
        handlers::health::index_handler,
        handlers::health::health_handler,
    ),
    components(schemas(
        ShortenRequest,
        ShortenCreated,
        ShortenExisting,
        ErrorBody,
        HealthResponse,
        HealthChecks,
        CheckStatus,
    )),
    tags(
        (name = "links", description = "Shorten and redirect"),
        (name = "health", description = "Liveness and store checks")
    )
)]
pub struct ApiDoc;

/// Serves the OpenAPI document.
///
/// # Endpoint
///
/// `GET /api-docs` and `GET /api-docs/openapi.json`
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
