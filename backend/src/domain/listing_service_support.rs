//! Helpers shared by the catalog and relations services.

use std::collections::HashMap;

use tracing::error;

use crate::domain::ports::{
    CacheKey, ListingPersistenceError, UserPersistenceError, UserRepository,
};
use crate::domain::{Error, Listing, ListingView, UserId, UserSummary};

pub(crate) fn map_listing_error(err: ListingPersistenceError) -> Error {
    error!(error = %err, "listing store failure");
    Error::internal(format!("listing store failure: {err}"))
}

pub(crate) fn map_user_error(err: UserPersistenceError) -> Error {
    error!(error = %err, "user store failure");
    Error::internal(format!("user store failure: {err}"))
}

pub(crate) fn listing_not_found() -> Error {
    Error::not_found("Property not found")
}

/// Keys holding a user's expanded relations.
pub(crate) fn user_keys(user: UserId) -> [CacheKey; 2] {
    [
        CacheKey::user_favorites(user),
        CacheKey::user_recommendations(user),
    ]
}

/// Resolve public identities for `ids`, keyed by user id.
pub(crate) async fn summaries_by_id<U>(
    users: &U,
    ids: impl IntoIterator<Item = UserId>,
) -> Result<HashMap<UserId, UserSummary>, Error>
where
    U: UserRepository + ?Sized,
{
    let mut ids: Vec<UserId> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let summaries = users.find_summaries(&ids).await.map_err(map_user_error)?;
    Ok(summaries
        .into_iter()
        .map(|summary| (summary.id, summary))
        .collect())
}

/// Attach owner identities to `listings`, preserving order.
pub(crate) async fn expand_listings<U>(
    users: &U,
    listings: &[Listing],
) -> Result<Vec<ListingView>, Error>
where
    U: UserRepository + ?Sized,
{
    let owners = summaries_by_id(users, listings.iter().map(Listing::owner)).await?;
    Ok(listings
        .iter()
        .map(|listing| ListingView::new(listing, owners.get(&listing.owner()).cloned()))
        .collect())
}
