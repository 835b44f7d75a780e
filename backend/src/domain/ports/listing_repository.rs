//! Port abstraction for listing persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Listing, ListingFilter, ListingId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by listing repository adapters.
    pub enum ListingPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "listing repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "listing repository query failed: {message}",
    }
}

/// Authoritative listing store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Persist a new listing.
    async fn insert(&self, listing: &Listing) -> Result<(), ListingPersistenceError>;

    /// Fetch a listing by identifier.
    async fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, ListingPersistenceError>;

    /// Fetch the listings that still exist among `ids`, in no particular order.
    async fn find_many(&self, ids: &[ListingId]) -> Result<Vec<Listing>, ListingPersistenceError>;

    /// Return listings matching `filter`, newest first.
    async fn list(&self, filter: &ListingFilter) -> Result<Vec<Listing>, ListingPersistenceError>;

    /// Overwrite an existing listing. Returns `false` when it no longer exists.
    async fn update(&self, listing: &Listing) -> Result<bool, ListingPersistenceError>;

    /// Delete a listing. Returns `false` when it did not exist.
    async fn delete(&self, id: &ListingId) -> Result<bool, ListingPersistenceError>;
}
