//! Classification of raw SQLx errors.

use crate::error::UniqueField;

/// Unique constraint on `links.code`.
pub const CODE_CONSTRAINT: &str = "links_code_key";

/// Unique constraint on `links.long_url`.
pub const LONG_URL_CONSTRAINT: &str = "links_long_url_key";

/// Returns the violated field when `e` is a unique-constraint violation.
///
/// Violations of an unrecognised constraint are attributed to the short code,
/// which makes the coordinator retry with a fresh code.
pub fn unique_violation_field(e: &sqlx::Error) -> Option<UniqueField> {
    let db_err = e.as_database_error()?;

    if !db_err.is_unique_violation() {
        return None;
    }

    match db_err.constraint() {
        Some(LONG_URL_CONSTRAINT) => Some(UniqueField::LongUrl),
        _ => Some(UniqueField::Code),
    }
}

/// Returns true when the error means the database could not be reached.
pub fn is_connectivity_error(e: &sqlx::Error) -> bool {
    matches!(
        e,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}
