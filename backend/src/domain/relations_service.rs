//! Favorites and recommendations implementing the [`UserRelations`] port.
//!
//! Relation mutations invalidate both of the affected user's cached views.
//! Duplicate checks read the account and then write without isolation, so
//! two concurrent identical requests may both succeed; the store's unique
//! constraints keep the relation itself deduplicated.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::listing_service_support::{
    expand_listings, listing_not_found, map_listing_error, map_user_error, summaries_by_id,
    user_keys,
};
use crate::domain::ports::{
    CacheKey, FavoriteOutcome, ListingRepository, RecommendOutcome, RecommendationView,
    SnapshotCache, UserRelations, UserRepository,
};
use crate::domain::{
    CacheAside, Email, Error, Listing, ListingId, ListingView, Principal, Recommendation,
    UserAccount, UserId,
};

/// Per-user favorites and recommendations service.
#[derive(Clone)]
pub struct UserRelationsService<L: ?Sized, U: ?Sized> {
    listings: Arc<L>,
    users: Arc<U>,
    cache: CacheAside,
    clock: Arc<dyn Clock>,
}

impl<L: ?Sized, U: ?Sized> UserRelationsService<L, U> {
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

impl<L, U> UserRelationsService<L, U>
where
    L: ListingRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    async fn account(&self, id: UserId) -> Result<UserAccount, Error> {
        self.users
            .find_by_id(&id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }

    async fn require_listing(&self, id: &ListingId) -> Result<Listing, Error> {
        self.listings
            .find_by_id(id)
            .await
            .map_err(map_listing_error)?
            .ok_or_else(listing_not_found)
    }

    /// Listings that still exist among `ids`, in the order of `ids`.
    async fn listings_in_order(&self, ids: &[ListingId]) -> Result<Vec<Listing>, Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut found: HashMap<ListingId, Listing> = self
            .listings
            .find_many(ids)
            .await
            .map_err(map_listing_error)?
            .into_iter()
            .map(|listing| (listing.id(), listing))
            .collect();
        Ok(ids.iter().filter_map(|id| found.remove(id)).collect())
    }
}

#[async_trait]
impl<L, U> UserRelations for UserRelationsService<L, U>
where
    L: ListingRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    async fn add_favorite(
        &self,
        principal: &Principal,
        listing: &ListingId,
    ) -> Result<FavoriteOutcome, Error> {
        self.require_listing(listing).await?;
        let mut account = self.account(principal.id()).await?;
        if !account.add_favorite(*listing) {
            debug!(user_id = %principal.id(), listing_id = %listing, "favorite already present");
            return Ok(FavoriteOutcome::AlreadyPresent);
        }
        self.users
            .add_favorite(&principal.id(), listing)
            .await
            .map_err(map_user_error)?;
        self.cache.invalidate(&user_keys(principal.id())).await;

        info!(user_id = %principal.id(), listing_id = %listing, "favorite added");
        Ok(FavoriteOutcome::Added(account.favorites().to_vec()))
    }

    async fn remove_favorite(
        &self,
        principal: &Principal,
        listing: &ListingId,
    ) -> Result<Vec<ListingId>, Error> {
        let mut account = self.account(principal.id()).await?;
        self.users
            .remove_favorite(&principal.id(), listing)
            .await
            .map_err(map_user_error)?;
        account.remove_favorite(*listing);
        self.cache.invalidate(&user_keys(principal.id())).await;

        info!(user_id = %principal.id(), listing_id = %listing, "favorite removed");
        Ok(account.favorites().to_vec())
    }

    async fn list_favorites(&self, principal: &Principal) -> Result<Vec<ListingView>, Error> {
        let key = CacheKey::user_favorites(principal.id());
        self.cache
            .read_through(&key, || async {
                let account = self.account(principal.id()).await?;
                let listings = self.listings_in_order(account.favorites()).await?;
                expand_listings(self.users.as_ref(), &listings).await
            })
            .await
    }

    async fn recommend(
        &self,
        sender: &Principal,
        listing: &ListingId,
        recipient: &Email,
    ) -> Result<RecommendOutcome, Error> {
        self.require_listing(listing).await?;
        let mut recipient = self
            .users
            .find_by_email(recipient)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("Recipient not found"))?;

        let entry = Recommendation {
            listing: *listing,
            from: sender.id(),
            recommended_at: self.clock.utc(),
        };
        if !recipient.receive_recommendation(entry.clone()) {
            debug!(
                sender = %sender.id(),
                recipient = %recipient.id(),
                listing_id = %listing,
                "recommendation already sent"
            );
            return Ok(RecommendOutcome::AlreadyRecommended);
        }
        self.users
            .add_recommendation(&recipient.id(), &entry)
            .await
            .map_err(map_user_error)?;
        self.cache.invalidate(&user_keys(recipient.id())).await;

        info!(
            sender = %sender.id(),
            recipient = %recipient.id(),
            listing_id = %listing,
            "recommendation sent"
        );
        Ok(RecommendOutcome::Recommended)
    }

    async fn list_recommendations(
        &self,
        principal: &Principal,
    ) -> Result<Vec<RecommendationView>, Error> {
        let key = CacheKey::user_recommendations(principal.id());
        self.cache
            .read_through(&key, || async {
                let account = self.account(principal.id()).await?;
                let entries = account.recommendations();
                let ids: Vec<ListingId> = entries.iter().map(|entry| entry.listing).collect();
                let listings = self.listings_in_order(&ids).await?;

                let people = summaries_by_id(
                    self.users.as_ref(),
                    listings
                        .iter()
                        .map(Listing::owner)
                        .chain(entries.iter().map(|entry| entry.from)),
                )
                .await?;
                let views: HashMap<ListingId, ListingView> = listings
                    .iter()
                    .map(|listing| {
                        let owner = people.get(&listing.owner()).cloned();
                        (listing.id(), ListingView::new(listing, owner))
                    })
                    .collect();

                Ok(entries
                    .iter()
                    .filter_map(|entry| {
                        let property = views.get(&entry.listing)?.clone();
                        let from = people.get(&entry.from)?.clone();
                        Some(RecommendationView {
                            property,
                            from,
                            recommended_at: entry.recommended_at,
                        })
                    })
                    .collect())
            })
            .await
    }
}

#[cfg(test)]
#[path = "relations_service_tests.rs"]
mod tests;
