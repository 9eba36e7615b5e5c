use serde::Deserialize;
use std::num::{NonZeroU32, NonZeroU64};

/// Configuration for connecting to the SQLite database.
#[derive(Debug, Deserialize)]
pub struct Database {
    /// Minimum idle database connections just to avoid paying the
    /// connection setup cost on every request.
    ///
    /// **Environment variables**:
    /// - `ROSTER_DB_MIN_IDLE`
    pub min_idle: Option<NonZeroU32>,
    /// Maximum amount of pool size that database can handle.
    ///
    /// **Environment variables**:
    /// - `ROSTER_DB_POOL_SIZE`
    #[serde(default = "Database::default_pool_size")]
    pub pool_size: NonZeroU32,
    /// How long this server can wait until its time limit where
    /// obtaining a database connection takes a while.
    ///
    /// **Environment variables**:
    /// - `ROSTER_DB_TIMEOUT_SECS`
    #[serde(default = "Database::default_timeout_secs")]
    pub timeout_secs: NonZeroU64,
    /// Connection URL connecting to the SQLite database. The file is
    /// created on first connect if it does not exist.
    ///
    /// **Environment variables**:
    /// - `ROSTER_DB_URL` or `DATABASE_URL`
    #[serde(default = "Database::default_url")]
    pub url: String,
}

impl Database {
    const DEFAULT_POOL_SIZE: u32 = 5;
    const DEFAULT_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_URL: &str = "sqlite://roster.db";

    /// In-memory database configuration for testing purposes.
    pub fn for_tests() -> Self {
        Self {
            min_idle: None,
            pool_size: Self::default_pool_size(),
            timeout_secs: Self::default_timeout_secs(),
            url: "sqlite::memory:".to_string(),
        }
    }

    // Required by serde
    const fn default_pool_size() -> NonZeroU32 {
        match NonZeroU32::new(Self::DEFAULT_POOL_SIZE) {
            Some(n) => n,
            None => panic!("DEFAULT_POOL_SIZE is accidentally set to 0"),
        }
    }

    const fn default_timeout_secs() -> NonZeroU64 {
        match NonZeroU64::new(Self::DEFAULT_TIMEOUT_SECS) {
            Some(n) => n,
            None => panic!("DEFAULT_TIMEOUT_SECS is accidentally set to 0"),
        }
    }

    fn default_url() -> String {
        Self::DEFAULT_URL.to_string()
    }
}
