//! Driving port for the listing catalog use-cases.
//!
//! Inbound adapters call this port without knowing how reads are cached or
//! where listings are stored, which keeps handler tests deterministic.

use async_trait::async_trait;

use crate::domain::{
    Error, ListingDraft, ListingFilter, ListingId, ListingPatch, ListingView, Principal,
};

/// Domain use-case port for listing lifecycle and queries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingCatalog: Send + Sync {
    /// Create a listing owned by `principal`.
    async fn create(&self, principal: &Principal, draft: ListingDraft)
    -> Result<ListingView, Error>;

    /// Listings matching `filter`, newest first.
    async fn list(&self, filter: &ListingFilter) -> Result<Vec<ListingView>, Error>;

    /// A single listing.
    async fn get(&self, id: &ListingId) -> Result<ListingView, Error>;

    /// Apply `patch` to a listing owned by `principal`.
    async fn update(
        &self,
        principal: &Principal,
        id: &ListingId,
        patch: ListingPatch,
    ) -> Result<ListingView, Error>;

    /// Delete a listing owned by `principal`.
    async fn delete(&self, principal: &Principal, id: &ListingId) -> Result<(), Error>;
}
