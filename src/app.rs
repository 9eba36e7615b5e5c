use error_stack::{Result, ResultExt};
use std::sync::Arc;
use thiserror::Error;

use crate::{config, database};

/// State shared by every worker and request.
#[derive(Debug, Clone)]
pub struct App {
    pub config: Arc<config::Server>,
    pub db: database::Pool,
}

#[derive(Debug, Error)]
#[error("Failed to initialize App struct")]
pub struct AppError;

impl App {
    #[tracing::instrument]
    pub async fn new(cfg: config::Server) -> Result<Self, AppError> {
        let db = database::Pool::new(&cfg.db).await.change_context(AppError)?;

        Ok(Self {
            config: Arc::new(cfg),
            db,
        })
    }

    /// Creates a new [`App`] for testing purposes, backed by a fresh
    /// in-memory database with the schema already applied.
    pub async fn new_for_tests() -> Self {
        Self {
            config: Arc::new(config::Server::for_tests()),
            db: database::Pool::connect_for_tests().await,
        }
    }
}

impl App {
    /// Obtains a database connection for writes.
    #[tracing::instrument(skip_all, name = "app.db_write")]
    pub async fn db_write(&self) -> Result<database::PoolConnection, database::Error> {
        self.db.get().await
    }

    /// Obtains a database connection for read-only statements.
    #[tracing::instrument(skip_all, name = "app.db_read")]
    pub async fn db_read(&self) -> Result<database::PoolConnection, database::Error> {
        self.db.get().await
    }
}
