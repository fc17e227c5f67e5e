//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::shorten::{
    ShortenCreated, ShortenExisting, ShortenRequest, ShortenResponse,
};
use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

/// Shortens a long URL, reusing the existing code if the URL is already stored.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "longUrl": "https://example.com" }
/// ```
///
/// # Response
///
/// **201 Created** for a new link:
///
/// ```json
/// { "longUrl": "https://example.com", "shortUrl": "abc123" }
/// ```
///
/// **200 OK** when the URL was already shortened:
///
/// ```json
/// { "message": "URL already shortened", "shortUrl": "abc123" }
/// ```
///
/// # Errors
///
/// - **400** `Invalid URL format` for a malformed or missing URL, or an
///   unreadable JSON body
/// - **500** `Database connection error` when the store is unreachable
/// - **500** `Internal server error` for other failures
#[utoipa::path(
    post,
    path = "/shorten",
    tag = "links",
    request_body = ShortenRequest,
    responses(
        (status = 201, description = "Short link created", body = ShortenCreated),
        (status = 200, description = "URL already shortened", body = ShortenExisting),
        (status = 400, description = "Invalid URL format", body = ErrorBody),
        (status = 500, description = "Database connection error or internal server error", body = ErrorBody)
    )
)]
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload.map_err(|e| AppError::invalid_input(e.body_text()))?;
    payload.validate()?;

    let long_url = payload.long_url.unwrap_or_default();
    let outcome = state.link_service.shorten(&long_url).await?;

    let response = ShortenResponse::from(outcome);
    Ok((response.status(), Json(response)))
}
