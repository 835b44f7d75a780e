//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports ([`ListingRepository`], [`UserRepository`],
//! [`SnapshotCache`], [`TokenVerifier`]) are implemented by outbound
//! adapters. Driving ports ([`ListingCatalog`], [`UserRelations`]) are
//! implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod cache_key;
mod listing_catalog;
mod listing_repository;
mod snapshot_cache;
mod token_verifier;
mod user_relations;
mod user_repository;

pub use cache_key::{CacheKey, CacheKeyValidationError};
pub use listing_catalog::ListingCatalog;
#[cfg(test)]
pub use listing_catalog::MockListingCatalog;
#[cfg(test)]
pub use listing_repository::MockListingRepository;
pub use listing_repository::{ListingPersistenceError, ListingRepository};
#[cfg(test)]
pub use snapshot_cache::MockSnapshotCache;
pub use snapshot_cache::{SnapshotCache, SnapshotCacheError};
#[cfg(test)]
pub use token_verifier::MockTokenVerifier;
pub use token_verifier::{TokenVerificationError, TokenVerifier};
#[cfg(test)]
pub use user_relations::MockUserRelations;
pub use user_relations::{FavoriteOutcome, RecommendOutcome, RecommendationView, UserRelations};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
