//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::debug;
use url::Url;

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Response
///
/// **302 Found** with a `Location` header and no body.
///
/// # Errors
///
/// - **404** `Short URL not found` if the code doesn't exist
/// - **500** `Server Error` on any store failure
#[utoipa::path(
    get,
    path = "/{code}",
    tag = "links",
    params(
        ("code" = String, Path, description = "Short code", example = "aB3_x9")
    ),
    responses(
        (status = 302, description = "Redirect to the long URL",
            headers(("Location" = String, description = "The long URL"))),
        (status = 404, description = "Short URL not found", body = ErrorBody),
        (status = 500, description = "Server Error", body = ErrorBody)
    )
)]
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let link = state
        .link_service
        .resolve(&code)
        .await
        .map_err(AppError::into_redirect_error)?;

    debug!(%code, "Redirecting");

    let location = location_header(&link.long_url).map_err(AppError::into_redirect_error)?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// Builds a `Location` value for a stored URL.
///
/// URLs containing non-ASCII characters are re-serialized by the URL parser,
/// which percent-encodes the path and punycodes the host.
fn location_header(long_url: &str) -> Result<HeaderValue, AppError> {
    if long_url.is_ascii()
        && let Ok(value) = HeaderValue::from_str(long_url)
    {
        return Ok(value);
    }

    let url = Url::parse(long_url)
        .map_err(|e| AppError::internal(format!("stored URL does not parse: {e}")))?;

    HeaderValue::from_str(url.as_str())
        .map_err(|e| AppError::internal(format!("stored URL is not a valid header: {e}")))
}
