#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use std::sync::{Arc, Mutex};

use link_shortener::application::services::LinkService;
use link_shortener::domain::entities::{Link, NewLink};
use link_shortener::domain::repositories::LinkRepository;
use link_shortener::error::AppError;
use link_shortener::infrastructure::persistence::InMemoryLinkRepository;
use link_shortener::routes::router;
use link_shortener::state::AppState;
use link_shortener::utils::code_generator::{CodeGenerator, GeneratorError};

pub fn create_test_state() -> (AppState, Arc<InMemoryLinkRepository>) {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let state = AppState::new(repo.clone());

    (state, repo)
}

pub fn create_test_server() -> (TestServer, Arc<InMemoryLinkRepository>) {
    let (state, repo) = create_test_state();
    let server = TestServer::new(router(state)).unwrap();

    (server, repo)
}

/// Yields the given codes in order, then repeats the last one.
pub struct SequenceCodeGenerator {
    codes: Mutex<Vec<String>>,
}

impl SequenceCodeGenerator {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            codes: Mutex::new(codes.iter().rev().map(|c| c.to_string()).collect()),
        }
    }
}

impl CodeGenerator for SequenceCodeGenerator {
    fn generate(&self) -> Result<String, GeneratorError> {
        let mut codes = self.codes.lock().unwrap();
        let code = if codes.len() > 1 {
            codes.pop().unwrap()
        } else {
            codes[0].clone()
        };
        Ok(code)
    }
}

pub fn create_test_server_with_codes(
    codes: &[&str],
) -> (TestServer, Arc<InMemoryLinkRepository>) {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let service = LinkService::<dyn LinkRepository>::with_generator(
        repo.clone(),
        Arc::new(SequenceCodeGenerator::new(codes)),
    );
    let server = TestServer::new(router(AppState::from_service(service))).unwrap();

    (server, repo)
}

pub async fn create_test_link(repo: &InMemoryLinkRepository, code: &str, url: &str) -> Link {
    repo.create(NewLink {
        code: code.to_string(),
        long_url: url.to_string(),
    })
    .await
    .unwrap()
}

/// How [`FailingLinkRepository`] fails.
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Unavailable,
    Internal,
}

/// A store whose every operation fails.
pub struct FailingLinkRepository {
    failure: Failure,
}

impl FailingLinkRepository {
    pub fn new(failure: Failure) -> Self {
        Self { failure }
    }

    fn error(&self) -> AppError {
        match self.failure {
            Failure::Unavailable => AppError::storage_unavailable("connection refused"),
            Failure::Internal => AppError::storage("relation \"links\" does not exist"),
        }
    }
}

#[async_trait]
impl LinkRepository for FailingLinkRepository {
    async fn create(&self, _new_link: NewLink) -> Result<Link, AppError> {
        Err(self.error())
    }

    async fn find_by_code(&self, _code: &str) -> Result<Option<Link>, AppError> {
        Err(self.error())
    }

    async fn find_by_long_url(&self, _long_url: &str) -> Result<Option<Link>, AppError> {
        Err(self.error())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Err(self.error())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(self.error())
    }
}

pub fn create_failing_server(failure: Failure) -> TestServer {
    let state = AppState::new(Arc::new(FailingLinkRepository::new(failure)));
    TestServer::new(router(state)).unwrap()
}
