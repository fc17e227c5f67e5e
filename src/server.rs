//! Service lifecycle: store setup, HTTP listener, graceful shutdown.
//!
//! The core ([`crate::application::services::LinkService`]) does not depend on
//! anything here and can be built directly around any
//! [`LinkRepository`] for tests or tools.

use crate::config::{Config, StoreKind};
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::persistence::{InMemoryLinkRepository, PgLinkRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::extract::Request;
use axum::{Router, ServiceExt};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::normalize_path::NormalizePath;

/// Opened link store.
pub struct Store {
    pub repository: Arc<dyn LinkRepository>,
    /// Present for the PostgreSQL store; closed on shutdown.
    pub pool: Option<PgPool>,
}

impl Store {
    /// Closes the underlying connection pool, if any.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
            tracing::info!("Database pool closed");
        }
    }
}

/// Opens the link store selected by the configuration.
///
/// For PostgreSQL this creates the connection pool and applies migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or migrations fail.
pub async fn open_store(config: &Config) -> Result<Store> {
    match config.store {
        StoreKind::Memory => {
            tracing::warn!("Using in-memory store; links are lost on restart");
            Ok(Store {
                repository: Arc::new(InMemoryLinkRepository::new()),
                pool: None,
            })
        }
        StoreKind::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set when STORE=postgres")?;

            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
                .idle_timeout(Duration::from_secs(config.db_idle_timeout))
                .max_lifetime(Duration::from_secs(config.db_max_lifetime))
                .connect(database_url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to apply migrations")?;

            let repository = PgLinkRepository::with_query_timeout(
                Arc::new(pool.clone()),
                config.query_timeout(),
            );

            Ok(Store {
                repository: Arc::new(repository),
                pool: Some(pool),
            })
        }
    }
}

/// An initialized service: store opened, router built, listener bound.
pub struct Server {
    store: Store,
    listener: TcpListener,
    app: NormalizePath<Router>,
}

impl Server {
    /// Opens the store and binds the listener.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Database connection or migration fails
    /// - Server bind fails
    pub async fn initialize(config: &Config) -> Result<Self> {
        let store = open_store(config).await?;

        let state = AppState::new(store.repository.clone());
        let app = app_router(state);

        let listener = TcpListener::bind(config.listen_addr())
            .await
            .with_context(|| format!("Failed to bind {}", config.listen_addr()))?;

        Ok(Self {
            store,
            listener,
            app,
        })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves requests until `signal` completes, then shuts down.
    ///
    /// In-flight requests are allowed to finish before the store is closed.
    pub async fn run<F>(self, signal: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Self {
            store,
            listener,
            app,
        } = self;

        tracing::info!("Listening on http://{}", listener.local_addr()?);

        let served = axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
            .with_graceful_shutdown(signal)
            .await;

        shutdown(&store).await;
        served?;

        Ok(())
    }
}

/// Releases resources held by the store.
pub async fn shutdown(store: &Store) {
    tracing::info!("Shutting down");
    store.close().await;
}

/// Completes on Ctrl-C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Runs the HTTP server with the given configuration until a shutdown signal.
///
/// # Errors
///
/// Returns an error if initialization fails or the server stops with an error.
pub async fn run(config: Config) -> Result<()> {
    let server = Server::initialize(&config).await?;
    server.run(shutdown_signal()).await
}
