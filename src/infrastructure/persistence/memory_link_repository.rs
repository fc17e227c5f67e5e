//! In-memory implementation of link repository.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::{AppError, UniqueField};

#[derive(Debug, Default)]
struct Storage {
    next_id: i64,
    by_code: HashMap<String, Link>,
    /// long URL -> code
    by_long_url: HashMap<String, String>,
}

/// Process-local link store with the same uniqueness rules as the PostgreSQL
/// schema.
///
/// Both indexes are updated under a single write lock, so the check-and-insert
/// in [`LinkRepository::create`] is atomic. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryLinkRepository {
    storage: RwLock<Storage>,
}

impl InMemoryLinkRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut storage = self.storage.write().await;

        if storage.by_code.contains_key(&new_link.code) {
            return Err(AppError::Conflict {
                field: UniqueField::Code,
            });
        }
        if storage.by_long_url.contains_key(&new_link.long_url) {
            return Err(AppError::Conflict {
                field: UniqueField::LongUrl,
            });
        }

        storage.next_id += 1;
        let link = Link::new(
            storage.next_id,
            new_link.code,
            new_link.long_url,
            Utc::now(),
        );

        storage
            .by_long_url
            .insert(link.long_url.clone(), link.code.clone());
        storage.by_code.insert(link.code.clone(), link.clone());

        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.storage.read().await.by_code.get(code).cloned())
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<Link>, AppError> {
        let storage = self.storage.read().await;

        Ok(storage
            .by_long_url
            .get(long_url)
            .and_then(|code| storage.by_code.get(code))
            .cloned())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.storage.read().await.by_code.len() as i64)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
