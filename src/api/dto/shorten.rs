//! DTOs for link shortening endpoint.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::entities::ShortenOutcome;

/// Request to shorten a URL.
///
/// A missing `longUrl` field deserializes to `None` and is rejected by
/// validation with the same error as a malformed URL. URL shape and byte
/// length are checked by the service.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    /// Absolute URL to shorten
    #[serde(default)]
    #[validate(required)]
    #[schema(example = "https://example.com/some/long/path")]
    pub long_url: Option<String>,
}

/// Body of a `201 Created` shorten response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShortenCreated {
    #[schema(example = "https://example.com/some/long/path")]
    pub long_url: String,
    /// The issued short code
    #[schema(example = "aB3_x9")]
    pub short_url: String,
}

/// Body of a `200 OK` shorten response for a URL that is already on record.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShortenExisting {
    #[schema(example = "URL already shortened")]
    pub message: String,
    /// The code issued earlier for this URL
    #[schema(example = "aB3_x9")]
    pub short_url: String,
}

/// Response for a shorten request.
///
/// Uses untagged enum for cleaner JSON structure (no discriminator field).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ShortenResponse {
    Created(ShortenCreated),
    Existing(ShortenExisting),
}

impl ShortenResponse {
    pub const ALREADY_SHORTENED: &'static str = "URL already shortened";

    /// HTTP status matching the outcome.
    pub fn status(&self) -> StatusCode {
        match self {
            ShortenResponse::Created(_) => StatusCode::CREATED,
            ShortenResponse::Existing(_) => StatusCode::OK,
        }
    }
}

impl From<ShortenOutcome> for ShortenResponse {
    fn from(outcome: ShortenOutcome) -> Self {
        match outcome {
            ShortenOutcome::Created(link) => ShortenResponse::Created(ShortenCreated {
                long_url: link.long_url,
                short_url: link.code,
            }),
            ShortenOutcome::Existing(link) => ShortenResponse::Existing(ShortenExisting {
                message: Self::ALREADY_SHORTENED.to_string(),
                short_url: link.code,
            }),
        }
    }
}
