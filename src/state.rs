//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::LinkService;
use crate::domain::repositories::LinkRepository;

/// State shared by all request handlers.
///
/// Cheap to clone: the service is reference-counted and holds no per-request data.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
}

impl AppState {
    /// Builds the state around a link store.
    pub fn new(link_repository: Arc<dyn LinkRepository>) -> Self {
        Self::from_service(LinkService::new(link_repository))
    }

    /// Builds the state around an already configured service.
    pub fn from_service(link_service: LinkService<dyn LinkRepository>) -> Self {
        Self {
            link_service: Arc::new(link_service),
        }
    }
}
