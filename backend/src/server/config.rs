//! Server settings loaded via OrthoConfig and the runtime configuration
//! object assembled from them.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::outbound::auth::JwtSecret;
use crate::outbound::cache::{DEFAULT_MAX_RETRIES, RedisSnapshotCache, RedisTimeouts};
use crate::outbound::persistence::DbPool;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Errors raised while interpreting [`ServerSettings`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("bind address {value:?} is not a socket address")]
    InvalidBindAddr { value: String },
    #[error("LISTINGS_JWT_SECRET must be set in release builds")]
    MissingJwtSecret,
}

/// Values controlling the HTTP server, layered from CLI flags, `LISTINGS_*`
/// environment variables, and a configuration file.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LISTINGS")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without it listings and users live in memory.
    pub database_url: Option<String>,
    /// Redis URL. Without it snapshots are cached in memory.
    pub redis_url: Option<String>,
    /// HMAC secret for bearer tokens.
    pub jwt_secret: Option<String>,
    /// Retries after a failed cache command.
    pub cache_max_retries: Option<u32>,
    /// Milliseconds to wait for a pooled Redis connection.
    pub cache_connect_timeout_ms: Option<u64>,
    /// Milliseconds allowed for one Redis command attempt.
    pub cache_command_timeout_ms: Option<u64>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

impl ServerSettings {
    /// Parse the bind address, falling back to `0.0.0.0:5000`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::InvalidBindAddr {
            value: raw.to_owned(),
        })
    }

    pub fn cache_max_retries(&self) -> u32 {
        self.cache_max_retries.unwrap_or(DEFAULT_MAX_RETRIES)
    }

    /// Per-attempt Redis limits, defaulting to [`RedisTimeouts::default`].
    pub fn cache_timeouts(&self) -> RedisTimeouts {
        let defaults = RedisTimeouts::default();
        RedisTimeouts {
            connect: self
                .cache_connect_timeout_ms
                .map_or(defaults.connect, Duration::from_millis),
            command: self
                .cache_command_timeout_ms
                .map_or(defaults.command, Duration::from_millis),
        }
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Return the configured token secret.
    ///
    /// Debug builds without a secret get a random one, so tokens do not
    /// survive a restart. Release builds refuse to start.
    pub fn jwt_secret(&self) -> Result<JwtSecret, SettingsError> {
        match self.jwt_secret.as_deref().filter(|s| !s.is_empty()) {
            Some(secret) => Ok(JwtSecret::new(secret)),
            None if cfg!(debug_assertions) => {
                warn!("LISTINGS_JWT_SECRET unset; using an ephemeral secret (dev only)");
                Ok(JwtSecret::new(Uuid::new_v4().as_bytes().to_vec()))
            }
            None => Err(SettingsError::MissingJwtSecret),
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) jwt_secret: JwtSecret,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) redis_cache: Option<RedisSnapshotCache>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, jwt_secret: JwtSecret) -> Self {
        Self {
            bind_addr,
            jwt_secret,
            db_pool: None,
            redis_cache: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database connection pool for the Diesel repositories.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Attach a Redis snapshot cache.
    #[must_use]
    pub fn with_redis_cache(mut self, cache: RedisSnapshotCache) -> Self {
        self.redis_cache = Some(cache);
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
