//! Link shortening and resolution service.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::entities::{Link, NewLink, ShortenOutcome};
use crate::domain::repositories::LinkRepository;
use crate::error::{AppError, UniqueField};
use crate::utils::code_generator::{CodeGenerator, RandomCodeGenerator, is_reserved_code};
use crate::utils::url_validator::validate_absolute_url;

/// Upper bound on candidate codes tried by a single shorten call.
pub const MAX_CODE_ATTEMPTS: usize = 10;

/// Service coordinating validation, collision avoidance, de-duplication and
/// persistence of short links.
///
/// Holds no state across calls: every operation re-reads the store, and all
/// uniqueness guarantees come from the store's constraints. Safe to share
/// between concurrent requests.
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    generator: Arc<dyn CodeGenerator>,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service generating random 6-character codes.
    pub fn new(link_repository: Arc<L>) -> Self {
        Self::with_generator(link_repository, Arc::new(RandomCodeGenerator::default()))
    }

    /// Creates a link service with a custom code generator.
    pub fn with_generator(link_repository: Arc<L>, generator: Arc<dyn CodeGenerator>) -> Self {
        Self {
            link_repository,
            generator,
        }
    }

    /// Shortens a long URL.
    ///
    /// # Flow
    ///
    /// 1. Validate the URL (no store access on failure)
    /// 2. Generate candidate codes until one is unused, up to [`MAX_CODE_ATTEMPTS`]
    /// 3. If the long URL is already stored, return its existing link and discard
    ///    the candidate
    /// 4. Otherwise insert the candidate
    ///
    /// # Concurrency
    ///
    /// The unused-code check and the insert are not atomic. If another request
    /// claims the code in between, the insert fails on the code constraint and a
    /// fresh code is drawn from the remaining attempts. If another request
    /// stores the same long URL in between, the insert fails on the long URL
    /// constraint and the winner's link is returned as
    /// [`ShortenOutcome::Existing`].
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidInput`] if the URL is not a valid absolute URL
    /// - [`AppError::Exhausted`] if no unused code was found
    /// - [`AppError::StorageUnavailable`] / [`AppError::Storage`] on store failures
    /// - [`AppError::Internal`] if the random number generator fails
    pub async fn shorten(&self, long_url: &str) -> Result<ShortenOutcome, AppError> {
        validate_absolute_url(long_url).map_err(|e| AppError::invalid_input(e.to_string()))?;

        let mut attempts = 0;
        let mut code = self.next_free_code(&mut attempts).await?;

        if let Some(existing) = self.link_repository.find_by_long_url(long_url).await? {
            debug!(code = %existing.code, "Long URL already shortened");
            return Ok(ShortenOutcome::Existing(existing));
        }

        loop {
            let new_link = NewLink {
                code,
                long_url: long_url.to_string(),
            };

            match self.link_repository.create(new_link).await {
                Ok(link) => {
                    info!(code = %link.code, "Short link created");
                    return Ok(ShortenOutcome::Created(link));
                }
                Err(AppError::Conflict {
                    field: UniqueField::Code,
                }) => {
                    warn!("Short code claimed concurrently, drawing a new one");
                    code = self.next_free_code(&mut attempts).await?;
                }
                Err(AppError::Conflict {
                    field: UniqueField::LongUrl,
                }) => {
                    warn!("Long URL stored concurrently, returning existing link");
                    return self
                        .link_repository
                        .find_by_long_url(long_url)
                        .await?
                        .map(ShortenOutcome::Existing)
                        .ok_or_else(|| {
                            AppError::storage("long URL conflict reported but no record found")
                        });
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Resolves a short code to its link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns a storage error if the store fails.
    pub async fn resolve(&self, code: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found(code))
    }

    /// Number of stored links.
    pub async fn count_links(&self) -> Result<i64, AppError> {
        self.link_repository.count().await
    }

    /// Verifies the store is reachable.
    pub async fn check_store(&self) -> Result<(), AppError> {
        self.link_repository.ping().await
    }

    /// Draws candidates until one is unused, sharing `attempts` with the caller.
    async fn next_free_code(&self, attempts: &mut usize) -> Result<String, AppError> {
        while *attempts < MAX_CODE_ATTEMPTS {
            *attempts += 1;

            let code = self.generator.generate()?;

            if is_reserved_code(&code) {
                debug!(%code, attempt = *attempts, "Short code shadowed by a route");
                continue;
            }

            if self.link_repository.find_by_code(&code).await?.is_none() {
                return Ok(code);
            }

            debug!(%code, attempt = *attempts, "Short code collision");
        }

        warn!(attempts = MAX_CODE_ATTEMPTS, "No free short code found");
        Err(AppError::Exhausted {
            attempts: MAX_CODE_ATTEMPTS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::utils::code_generator::{GeneratorError, MockCodeGenerator};
    use chrono::Utc;

    fn create_test_link(id: i64, code: &str, url: &str) -> Link {
        Link::new(id, code.to_string(), url.to_string(), Utc::now())
    }

    fn fixed_generator(code: &'static str) -> Arc<MockCodeGenerator> {
        let mut generator = MockCodeGenerator::new();
        generator
            .expect_generate()
            .returning(move || Ok(code.to_string()));
        Arc::new(generator)
    }

    fn sequence_generator(codes: &'static [&'static str]) -> Arc<MockCodeGenerator> {
        let mut generator = MockCodeGenerator::new();
        let mut next = 0;
        generator.expect_generate().returning(move || {
            let code = codes[next % codes.len()];
            next += 1;
            Ok(code.to_string())
        });
        Arc::new(generator)
    }

    #[tokio::test]
    async fn test_shorten_creates_new_link() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_find_by_code()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|_| Ok(None));

        mock_link_repo
            .expect_find_by_long_url()
            .times(1)
            .returning(|_| Ok(None));

        mock_link_repo
            .expect_create()
            .withf(|new_link| new_link.code == "abc123" && new_link.long_url == "https://example.com")
            .times(1)
            .returning(|new_link| Ok(create_test_link(1, &new_link.code, &new_link.long_url)));

        let service =
            LinkService::with_generator(Arc::new(mock_link_repo), fixed_generator("abc123"));

        let outcome = service.shorten("https://example.com").await.unwrap();

        assert!(outcome.is_created());
        assert_eq!(outcome.link().code, "abc123");
        assert_eq!(outcome.link().long_url, "https://example.com");
    }

    #[tokio::test]
    async fn test_shorten_returns_existing_link() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(None));

        let existing_link = create_test_link(5, "abc123", "https://example.com");
        mock_link_repo
            .expect_find_by_long_url()
            .withf(|url| url == "https://example.com")
            .times(1)
            .returning(move |_| Ok(Some(existing_link.clone())));

        mock_link_repo.expect_create().times(0);

        let service =
            LinkService::with_generator(Arc::new(mock_link_repo), fixed_generator("zzzzzz"));

        let outcome = service.shorten("https://example.com").await.unwrap();

        assert!(!outcome.is_created());
        assert_eq!(outcome.link().id, 5);
        assert_eq!(outcome.link().code, "abc123");
    }

    #[tokio::test]
    async fn test_shorten_invalid_url_touches_nothing() {
        let mut generator = MockCodeGenerator::new();
        generator.expect_generate().times(0);

        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo.expect_find_by_code().times(0);
        mock_link_repo.expect_find_by_long_url().times(0);
        mock_link_repo.expect_create().times(0);

        let service = LinkService::with_generator(Arc::new(mock_link_repo), Arc::new(generator));

        for input in ["invalid-url", "", "mailto:a@example.com", " https://example.com"] {
            let result = service.shorten(input).await;
            assert!(
                matches!(result, Err(AppError::InvalidInput { .. })),
                "{input:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_shorten_retries_on_collision() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_find_by_code()
            .times(3)
            .returning(|code| {
                if code == "free00" {
                    Ok(None)
                } else {
                    Ok(Some(create_test_link(1, code, "https://other.com")))
                }
            });

        mock_link_repo
            .expect_find_by_long_url()
            .times(1)
            .returning(|_| Ok(None));

        mock_link_repo
            .expect_create()
            .withf(|new_link| new_link.code == "free00")
            .times(1)
            .returning(|new_link| Ok(create_test_link(2, &new_link.code, &new_link.long_url)));

        let service = LinkService::with_generator(
            Arc::new(mock_link_repo),
            sequence_generator(&["taken1", "taken2", "free00"]),
        );

        let outcome = service.shorten("https://example.com").await.unwrap();

        assert!(outcome.is_created());
        assert_eq!(outcome.link().code, "free00");
    }

    #[tokio::test]
    async fn test_shorten_skips_reserved_code() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_find_by_code()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|_| Ok(None));

        mock_link_repo
            .expect_find_by_long_url()
            .times(1)
            .returning(|_| Ok(None));

        mock_link_repo
            .expect_create()
            .withf(|new_link| new_link.code == "abc123")
            .times(1)
            .returning(|new_link| Ok(create_test_link(1, &new_link.code, &new_link.long_url)));

        let service = LinkService::with_generator(
            Arc::new(mock_link_repo),
            sequence_generator(&["health", "abc123"]),
        );

        let outcome = service.shorten("https://example.com").await.unwrap();

        assert_eq!(outcome.link().code, "abc123");
    }

    #[tokio::test]
    async fn test_shorten_exhausts_attempts() {
        let mut generator = MockCodeGenerator::new();
        generator
            .expect_generate()
            .times(MAX_CODE_ATTEMPTS)
            .returning(|| Ok("taken1".to_string()));

        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo
            .expect_find_by_code()
            .times(MAX_CODE_ATTEMPTS)
            .returning(|code| Ok(Some(create_test_link(1, code, "https://other.com"))));
        mock_link_repo.expect_find_by_long_url().times(0);
        mock_link_repo.expect_create().times(0);

        let service = LinkService::with_generator(Arc::new(mock_link_repo), Arc::new(generator));

        let result = service.shorten("https://example.com").await;

        assert!(matches!(
            result,
            Err(AppError::Exhausted {
                attempts: MAX_CODE_ATTEMPTS
            })
        ));
    }

    #[tokio::test]
    async fn test_shorten_recovers_from_code_race() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_find_by_code()
            .times(2)
            .returning(|_| Ok(None));

        mock_link_repo
            .expect_find_by_long_url()
            .times(1)
            .returning(|_| Ok(None));

        let mut inserts = 0;
        mock_link_repo
            .expect_create()
            .times(2)
            .returning(move |new_link| {
                inserts += 1;
                if inserts == 1 {
                    Err(AppError::Conflict {
                        field: UniqueField::Code,
                    })
                } else {
                    Ok(create_test_link(3, &new_link.code, &new_link.long_url))
                }
            });

        let service = LinkService::with_generator(
            Arc::new(mock_link_repo),
            sequence_generator(&["raced1", "second"]),
        );

        let outcome = service.shorten("https://example.com").await.unwrap();

        assert!(outcome.is_created());
        assert_eq!(outcome.link().code, "second");
    }

    #[tokio::test]
    async fn test_shorten_returns_winner_on_long_url_race() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(None));

        let mut lookups = 0;
        mock_link_repo
            .expect_find_by_long_url()
            .times(2)
            .returning(move |url| {
                lookups += 1;
                if lookups == 1 {
                    Ok(None)
                } else {
                    Ok(Some(create_test_link(7, "winner", url)))
                }
            });

        mock_link_repo.expect_create().times(1).returning(|_| {
            Err(AppError::Conflict {
                field: UniqueField::LongUrl,
            })
        });

        let service =
            LinkService::with_generator(Arc::new(mock_link_repo), fixed_generator("loser1"));

        let outcome = service.shorten("https://example.com").await.unwrap();

        assert!(!outcome.is_created());
        assert_eq!(outcome.link().code, "winner");
    }

    #[tokio::test]
    async fn test_shorten_propagates_storage_unavailable() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_find_by_code()
            .times(1)
            .returning(|_| Err(AppError::storage_unavailable("connection refused")));
        mock_link_repo.expect_create().times(0);

        let service =
            LinkService::with_generator(Arc::new(mock_link_repo), fixed_generator("abc123"));

        let result = service.shorten("https://example.com").await;

        assert!(matches!(result, Err(AppError::StorageUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_shorten_propagates_insert_failure() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_find_by_code()
            .returning(|_| Ok(None));
        mock_link_repo
            .expect_find_by_long_url()
            .returning(|_| Ok(None));
        mock_link_repo
            .expect_create()
            .times(1)
            .returning(|_| Err(AppError::storage("disk full")));

        let service =
            LinkService::with_generator(Arc::new(mock_link_repo), fixed_generator("abc123"));

        let result = service.shorten("https://example.com").await;

        assert!(matches!(result, Err(AppError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_shorten_generator_failure_is_fatal() {
        let mut generator = MockCodeGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .returning(|| Err(GeneratorError::Entropy("no entropy".to_string())));

        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo.expect_find_by_code().times(0);
        mock_link_repo.expect_create().times(0);

        let service = LinkService::with_generator(Arc::new(mock_link_repo), Arc::new(generator));

        let result = service.shorten("https://example.com").await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_resolve_found() {
        let mut mock_link_repo = MockLinkRepository::new();

        let link = create_test_link(1, "abc123", "https://example.com");
        mock_link_repo
            .expect_find_by_code()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));

        let service = LinkService::new(Arc::new(mock_link_repo));

        let link = service.resolve("abc123").await.unwrap();
        assert_eq!(link.long_url, "https://example.com");
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(None));

        let service = LinkService::new(Arc::new(mock_link_repo));

        let result = service.resolve("nonexistent").await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_resolve_storage_error() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_find_by_code()
            .times(1)
            .returning(|_| Err(AppError::storage("boom")));

        let service = LinkService::new(Arc::new(mock_link_repo));

        let result = service.resolve("abc123").await;
        assert!(matches!(result, Err(AppError::Storage { .. })));
    }
}
