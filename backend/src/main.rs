//! Listing service entry-point: loads settings, connects adapters, and runs
//! the HTTP server.

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use listings::inbound::http::health::HealthState;
use listings::outbound::cache::{RedisSnapshotCache, RetryPolicy};
use listings::outbound::persistence::{DbPool, PoolConfig};
use listings::server::{ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let secret = settings.jwt_secret().map_err(std::io::Error::other)?;
    let mut config = ServerConfig::new(bind_addr, secret);

    if let Some(url) = settings.database_url.as_deref() {
        let pool_config = PoolConfig::new(url).with_max_size(settings.db_max_connections());
        let pool = DbPool::new(pool_config)
            .await
            .map_err(|e| std::io::Error::other(format!("database pool: {e}")))?;
        pool.ping()
            .await
            .map_err(|e| std::io::Error::other(format!("database unreachable: {e}")))?;
        info!("using PostgreSQL repositories");
        config = config.with_db_pool(pool);
    } else {
        warn!("LISTINGS_DATABASE_URL unset; listings are kept in memory");
    }

    if let Some(url) = settings.redis_url.as_deref() {
        let retry = RetryPolicy::new(settings.cache_max_retries());
        let cache = RedisSnapshotCache::connect(url, retry, settings.cache_timeouts())
            .map_err(|e| std::io::Error::other(format!("redis cache: {e}")))?;
        info!("using Redis snapshot cache");
        config = config.with_redis_cache(cache);
    } else {
        warn!("LISTINGS_REDIS_URL unset; snapshots are cached in memory");
    }

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(listings::server::make_metrics()?));

    info!(%bind_addr, "starting listing service");
    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
