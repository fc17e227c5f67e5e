//! Absolute URL validation.
//!
//! A long URL is accepted when it parses as an absolute URL with a scheme and a
//! non-empty host. The scheme itself is not restricted. The URL is stored
//! exactly as submitted; no normalization takes place.

use url::Url;

/// Longest accepted long URL, in bytes.
///
/// Keeps the value within PostgreSQL's btree index row limit for the unique
/// constraint on `links.long_url`.
pub const MAX_LONG_URL_BYTES: usize = 2048;

/// Reasons a string is not a valid absolute URL.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL is empty")]
    Empty,

    #[error("URL is {len} bytes, limit is {max}")]
    TooLong { len: usize, max: usize },

    #[error("URL has leading or trailing whitespace")]
    SurroundingWhitespace,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("URL has no host")]
    MissingHost,
}

/// Checks that `input` is a well-formed absolute URL.
///
/// # Errors
///
/// Returns the first rule `input` violates.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_absolute_url("https://example.com").is_ok());
/// assert_eq!(validate_absolute_url(""), Err(UrlValidationError::Empty));
/// assert_eq!(validate_absolute_url("mailto:a@b.c"), Err(UrlValidationError::MissingHost));
/// ```
pub fn validate_absolute_url(input: &str) -> Result<(), UrlValidationError> {
    if input.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if input.len() > MAX_LONG_URL_BYTES {
        return Err(UrlValidationError::TooLong {
            len: input.len(),
            max: MAX_LONG_URL_BYTES,
        });
    }

    // The parser silently strips surrounding whitespace, which would make the
    // stored value differ from the validated one.
    if input.trim() != input {
        return Err(UrlValidationError::SurroundingWhitespace);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(UrlValidationError::MissingHost),
    }
}

/// Predicate form of [`validate_absolute_url`].
pub fn is_valid_absolute_url(input: &str) -> bool {
    validate_absolute_url(input).is_ok()
}
