//! Listing catalog service implementing the [`ListingCatalog`] driving port.
//!
//! Reads go through [`CacheAside`]; writes go straight to the store and then
//! invalidate the single-listing key and the unfiltered collection key.
//! Filtered collection entries are left to expire by TTL.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::listing_service_support::{
    expand_listings, listing_not_found, map_listing_error,
};
use crate::domain::ports::{
    CacheKey, ListingCatalog, ListingRepository, SnapshotCache, UserRepository,
};
use crate::domain::{
    CacheAside, Error, Listing, ListingDraft, ListingFilter, ListingId, ListingPatch,
    ListingView, Principal, authorize,
};

/// Listing lifecycle and query service.
#[derive(Clone)]
pub struct ListingCatalogService<L: ?Sized, U: ?Sized> {
    listings: Arc<L>,
    users: Arc<U>,
    cache: CacheAside,
    clock: Arc<dyn Clock>,
}

impl<L: ?Sized, U: ?Sized> ListingCatalogService<L, U> {
    /// Create a service over the given store, cache, and clock.
    pub fn new(
        listings: Arc<L>,
        users: Arc<U>,
        cache: Arc<dyn SnapshotCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            listings,
            users,
            cache: CacheAside::new(cache),
            clock,
        }
    }
}

impl<L, U> ListingCatalogService<L, U>
where
    L: ListingRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    async fn fetch(&self, id: &ListingId) -> Result<Listing, Error> {
        self.listings
            .find_by_id(id)
            .await
            .map_err(map_listing_error)?
            .ok_or_else(listing_not_found)
    }

    async fn fetch_owned(&self, principal: &Principal, id: &ListingId) -> Result<Listing, Error> {
        let listing = self.fetch(id).await?;
        authorize(principal, &listing).into_result()?;
        Ok(listing)
    }

    async fn invalidate_listing(&self, id: ListingId) {
        self.cache
            .invalidate(&[CacheKey::listing(id), CacheKey::all_listings()])
            .await;
    }
}

#[async_trait]
impl<L, U> ListingCatalog for ListingCatalogService<L, U>
where
    L: ListingRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    async fn create(
        &self,
        principal: &Principal,
        draft: ListingDraft,
    ) -> Result<ListingView, Error> {
        let listing = Listing::create(ListingId::random(), principal.id(), draft, self.clock.utc());
        self.listings
            .insert(&listing)
            .await
            .map_err(map_listing_error)?;
        self.cache.invalidate(&[CacheKey::all_listings()]).await;

        info!(listing_id = %listing.id(), owner = %principal.id(), "listing created");
        Ok(ListingView::new(&listing, Some(principal.summary())))
    }

    async fn list(&self, filter: &ListingFilter) -> Result<Vec<ListingView>, Error> {
        let key = CacheKey::listings(filter);
        self.cache
            .read_through(&key, || async {
                let mut listings = self
                    .listings
                    .list(filter)
                    .await
                    .map_err(map_listing_error)?;
                listings.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
                expand_listings(self.users.as_ref(), &listings).await
            })
            .await
    }

    async fn get(&self, id: &ListingId) -> Result<ListingView, Error> {
        let key = CacheKey::listing(*id);
        self.cache
            .read_through(&key, || async {
                let listing = self.fetch(id).await?;
                let mut views =
                    expand_listings(self.users.as_ref(), std::slice::from_ref(&listing)).await?;
                views.pop().ok_or_else(listing_not_found)
            })
            .await
    }

    async fn update(
        &self,
        principal: &Principal,
        id: &ListingId,
        patch: ListingPatch,
    ) -> Result<ListingView, Error> {
        let current = self.fetch_owned(principal, id).await?;
        let updated = current.apply(patch, self.clock.utc())?;
        let found = self
            .listings
            .update(&updated)
            .await
            .map_err(map_listing_error)?;
        if !found {
            return Err(listing_not_found());
        }
        self.invalidate_listing(*id).await;

        info!(listing_id = %id, owner = %principal.id(), "listing updated");
        Ok(ListingView::new(&updated, Some(principal.summary())))
    }

    async fn delete(&self, principal: &Principal, id: &ListingId) -> Result<(), Error> {
        self.fetch_owned(principal, id).await?;
        let found = self
            .listings
            .delete(id)
            .await
            .map_err(map_listing_error)?;
        if !found {
            return Err(listing_not_found());
        }
        self.invalidate_listing(*id).await;

        info!(listing_id = %id, owner = %principal.id(), "listing deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "catalog_service_tests.rs"]
mod tests;
