//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Default per-statement timeout.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// PostgreSQL repository for link storage and retrieval.
///
/// Uniqueness of `code` and `long_url` is enforced by the `links_code_key` and
/// `links_long_url_key` constraints (see `migrations/`). Every statement runs
/// under a bounded timeout; an elapsed timeout is reported as
/// [`AppError::StorageUnavailable`].
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
    query_timeout: Duration,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self::with_query_timeout(pool, DEFAULT_QUERY_TIMEOUT)
    }

    /// Creates a repository with a custom per-statement timeout.
    pub fn with_query_timeout(pool: Arc<PgPool>, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    async fn bounded<T, F>(&self, operation: &'static str, query: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(result) => result.map_err(AppError::from),
            Err(_) => Err(AppError::storage_unavailable(format!(
                "{operation} timed out after {}ms",
                self.query_timeout.as_millis()
            ))),
        }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        self.bounded(
            "insert link",
            sqlx::query_as::<_, Link>(
                r#"
            INSERT INTO links (code, long_url)
            VALUES ($1, $2)
            RETURNING id, code, long_url, created_at
            "#,
            )
            .bind(&new_link.code)
            .bind(&new_link.long_url)
            .fetch_one(self.pool.as_ref()),
        )
        .await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        self.bounded(
            "find link by code",
            sqlx::query_as::<_, Link>(
                r#"
            SELECT id, code, long_url, created_at
            FROM links
            WHERE code = $1
            "#,
            )
            .bind(code)
            .fetch_optional(self.pool.as_ref()),
        )
        .await
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<Link>, AppError> {
        self.bounded(
            "find link by long url",
            sqlx::query_as::<_, Link>(
                r#"
            SELECT id, code, long_url, created_at
            FROM links
            WHERE long_url = $1
            ORDER BY id
            LIMIT 1
            "#,
            )
            .bind(long_url)
            .fetch_optional(self.pool.as_ref()),
        )
        .await
    }

    async fn count(&self) -> Result<i64, AppError> {
        self.bounded(
            "count links",
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM links")
                .fetch_one(self.pool.as_ref()),
        )
        .await
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.bounded(
            "ping",
            sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(self.pool.as_ref()),
        )
        .await
        .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lazy_repository(query_timeout: Duration) -> PgLinkRepository {
        let pool = PgPool::connect_lazy("postgres://localhost/link_shortener").unwrap();
        PgLinkRepository::with_query_timeout(Arc::new(pool), query_timeout)
    }

    #[tokio::test]
    async fn test_elapsed_timeout_is_unavailable() {
        let repo = lazy_repository(Duration::from_millis(10));

        let result = repo
            .bounded(
                "stalled query",
                std::future::pending::<Result<(), sqlx::Error>>(),
            )
            .await;

        match result {
            Err(AppError::StorageUnavailable { reason }) => {
                assert!(reason.contains("stalled query timed out"), "{reason}");
            }
            other => panic!("expected StorageUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_completed_query_passes_through() {
        let repo = lazy_repository(Duration::from_secs(1));

        let ok = repo.bounded("ready", async { Ok::<_, sqlx::Error>(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err = repo
            .bounded("failing", async {
                Err::<(), _>(sqlx::Error::PoolTimedOut)
            })
            .await;
        assert!(matches!(err, Err(AppError::StorageUnavailable { .. })));
    }
}
