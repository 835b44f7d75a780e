//! Driving port for favorites and recommendations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Email, Error, ListingId, ListingView, Principal, UserSummary};

/// Result of adding a favorite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoriteOutcome {
    /// The listing was added; carries the resulting favorite ids.
    Added(Vec<ListingId>),
    /// The listing was already a favorite; nothing changed.
    AlreadyPresent,
}

/// Result of recommending a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendOutcome {
    /// The recommendation was appended to the recipient's log.
    Recommended,
    /// The sender already recommended this listing to the recipient.
    AlreadyRecommended,
}

/// Expanded recommendation as returned to clients and cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationView {
    pub property: ListingView,
    pub from: UserSummary,
    pub recommended_at: DateTime<Utc>,
}

/// Domain use-case port for per-user relations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRelations: Send + Sync {
    /// Add `listing` to the principal's favorites.
    async fn add_favorite(
        &self,
        principal: &Principal,
        listing: &ListingId,
    ) -> Result<FavoriteOutcome, Error>;

    /// Remove `listing` from the principal's favorites; returns the remaining ids.
    async fn remove_favorite(
        &self,
        principal: &Principal,
        listing: &ListingId,
    ) -> Result<Vec<ListingId>, Error>;

    /// The principal's favorites, expanded.
    async fn list_favorites(&self, principal: &Principal) -> Result<Vec<ListingView>, Error>;

    /// Recommend `listing` to the user registered under `recipient`.
    async fn recommend(
        &self,
        sender: &Principal,
        listing: &ListingId,
        recipient: &Email,
    ) -> Result<RecommendOutcome, Error>;

    /// Recommendations received by the principal, expanded.
    async fn list_recommendations(
        &self,
        principal: &Principal,
    ) -> Result<Vec<RecommendationView>, Error>;
}
