//! Builders wiring adapters into the HTTP state.
//!
//! A configured pool selects the Diesel repositories and a configured Redis
//! cache selects the Redis snapshot store. Otherwise the in-process
//! adapters are used, which suits local runs and tests.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use crate::domain::ports::{ListingRepository, SnapshotCache, UserRepository};
use crate::domain::{ListingCatalogService, UserRelationsService};
use crate::inbound::http::state::HttpState;
use crate::outbound::auth::{JwtSecret, JwtTokenVerifier};
use crate::outbound::cache::InMemorySnapshotCache;
use crate::outbound::memory::{InMemoryListingRepository, InMemoryUserRepository};
use crate::outbound::persistence::{DieselListingRepository, DieselUserRepository};

use super::ServerConfig;

/// Store, cache, and clock shared by both services.
#[derive(Clone)]
pub struct Adapters {
    pub listings: Arc<dyn ListingRepository>,
    pub users: Arc<dyn UserRepository>,
    pub cache: Arc<dyn SnapshotCache>,
    pub clock: Arc<dyn Clock>,
}

impl Adapters {
    /// Process-local adapters over the given clock.
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self {
            listings: Arc::new(InMemoryListingRepository::default()),
            users: Arc::new(InMemoryUserRepository::default()),
            cache: Arc::new(InMemorySnapshotCache::new(clock.clone())),
            clock,
        }
    }

    fn from_config(config: &ServerConfig) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        let mut adapters = Self::in_memory(clock);
        if let Some(pool) = &config.db_pool {
            adapters.listings = Arc::new(DieselListingRepository::new(pool.clone()));
            adapters.users = Arc::new(DieselUserRepository::new(pool.clone()));
        }
        if let Some(cache) = &config.redis_cache {
            adapters.cache = Arc::new(cache.clone());
        }
        adapters
    }
}

/// Assemble the catalog and relations services plus the token verifier.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use listings::outbound::auth::JwtSecret;
/// use listings::server::{Adapters, build_state_from};
///
/// let adapters = Adapters::in_memory(Arc::new(mockable::DefaultClock));
/// let state = build_state_from(adapters, &JwtSecret::new("dev"));
/// ```
pub fn build_state_from(adapters: Adapters, secret: &JwtSecret) -> HttpState {
    let Adapters {
        listings,
        users,
        cache,
        clock,
    } = adapters;

    let catalog = ListingCatalogService::new(
        listings.clone(),
        users.clone(),
        cache.clone(),
        clock.clone(),
    );
    let relations = UserRelationsService::new(listings, users.clone(), cache, clock);
    let tokens = JwtTokenVerifier::new(secret, users);

    HttpState::new(Arc::new(catalog), Arc::new(relations), Arc::new(tokens))
}

pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let adapters = Adapters::from_config(config);
    web::Data::new(build_state_from(adapters, &config.jwt_secret))
}
