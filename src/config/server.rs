use error_stack::{Report, Result};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::num::NonZeroUsize;

use super::ParseError;
use crate::util::figment::FigmentErrorAttachable;

#[derive(Debug, Deserialize)]
pub struct Server {
    /// Address the HTTP server binds to.
    ///
    /// **Environment variables**:
    /// - `ROSTER_IP`
    #[serde(default = "Server::default_ip")]
    pub ip: IpAddr,
    /// Port the HTTP server binds to.
    ///
    /// **Environment variables**:
    /// - `ROSTER_PORT`
    #[serde(default = "Server::default_port")]
    pub port: u16,
    /// Amount of HTTP worker threads.
    ///
    /// **Environment variables**:
    /// - `ROSTER_WORKERS`
    #[serde(default = "Server::default_workers")]
    pub workers: NonZeroUsize,
    pub db: super::Database,
}

impl Server {
    pub fn load() -> Result<Self, ParseError> {
        dotenvy::dotenv().ok();

        let config = Self::figment()
            .extract::<Self>()
            .map_err(|e| Report::new(ParseError).attach_figment_error(e))?;

        Ok(config)
    }

    /// Configuration for testing purposes, backed by an in-memory database.
    pub fn for_tests() -> Self {
        Self {
            ip: Self::default_ip(),
            port: Self::default_port(),
            workers: NonZeroUsize::MIN,
            db: super::Database::for_tests(),
        }
    }
}

impl Server {
    const DEFAULT_CONFIG_FILE: &str = "roster.toml";

    /// Creates a default [`figment::Figment`] object to load server
    /// configuration. This function is there for implementing
    /// [`Server::load`] and testing.
    pub(crate) fn figment() -> figment::Figment {
        use figment::providers::{Env, Format, Toml};
        use figment::Figment;

        Figment::new()
            .merge(Toml::file(Self::DEFAULT_CONFIG_FILE))
            // figment's env provider treats every `_` as a nesting
            // separator, which mangles leaf keys like `pool_size`.
            .merge(Env::prefixed("ROSTER_").map(|v| match v.as_str() {
                "DB_MIN_IDLE" => "db.min_idle".into(),
                "DB_POOL_SIZE" => "db.pool_size".into(),
                "DB_TIMEOUT_SECS" => "db.timeout_secs".into(),
                _ => v.as_str().replace('_', ".").into(),
            }))
            // Environment variable aliases
            .merge(Env::raw().map(|v| match v.as_str() {
                "DATABASE_URL" => "db.url".into(),
                _ => v.into(),
            }))
    }

    const fn default_ip() -> IpAddr {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    }

    const fn default_port() -> u16 {
        3000
    }

    const fn default_workers() -> NonZeroUsize {
        NonZeroUsize::MIN
    }
}
