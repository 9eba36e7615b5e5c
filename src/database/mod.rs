use error_stack::{Report, ResultExt};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

use crate::config;

mod error;
pub use error::*;

pub mod migrations;

pub type PoolConnection = sqlx::pool::PoolConnection<sqlx::Sqlite>;
pub type Connection = sqlx::SqliteConnection;

/// Cheaply cloneable handle over the service's SQLite pool.
#[derive(Clone)]
pub struct Pool {
    pool: sqlx::SqlitePool,
}

impl Pool {
    pub(crate) async fn new(cfg: &config::Database) -> Result<Self> {
        let mut pool_opts = SqlitePoolOptions::new()
            .acquire_timeout(Duration::from_secs(cfg.timeout_secs.get()))
            .max_connections(cfg.pool_size.get());

        if let Some(min_idle) = cfg.min_idle {
            pool_opts = pool_opts.min_connections(min_idle.get());
        }

        let connect_opts = SqliteConnectOptions::from_str(&cfg.url)
            .change_context(Error::InvalidUrl)?
            .create_if_missing(true);

        let pool = Self {
            pool: pool_opts.connect_lazy_with(connect_opts),
        };

        match pool.wait_until_healthy().await {
            Ok(..) => {}
            Err(err) if err.is_unhealthy() => {}
            Err(err) => return Err(err),
        }

        Ok(pool)
    }

    /// Creates a [`Pool`] for testing purposes.
    ///
    /// It is backed by a fresh in-memory database with the schema already
    /// applied, capped at a single connection so every acquire observes the
    /// same database.
    pub async fn connect_for_tests() -> Self {
        let connect_opts = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
        let pool = Self {
            pool: SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_lazy_with(connect_opts),
        };

        let mut conn = pool.get().await.unwrap();
        migrations::run_pending(&mut conn).await.unwrap();
        drop(conn);

        pool
    }
}

impl std::fmt::Debug for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.pool.fmt(f)
    }
}

impl Pool {
    #[inline(always)]
    pub fn connections(&self) -> u32 {
        self.pool.size()
    }

    #[inline(always)]
    pub fn is_healthy(&self) -> bool {
        self.connections() > 0
    }

    #[tracing::instrument(name = "db.connect", skip(self))]
    pub async fn get(&self) -> Result<PoolConnection> {
        if let Some(inner) = self.pool.try_acquire() {
            return Ok(inner);
        }
        self.pool.acquire().await.into_db_error()
    }

    #[tracing::instrument(skip(self))]
    pub async fn wait_until_healthy(&self) -> Result<()> {
        match self.pool.acquire().await {
            Ok(..) => Ok(()),
            Err(e) if !self.is_healthy() => Err(e).change_context(Error::UnhealthyPool),
            Err(err) => Err(Report::new(Error::Internal(err))),
        }
    }
}
