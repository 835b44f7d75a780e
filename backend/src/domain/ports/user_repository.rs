//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Email, ListingId, Recommendation, UserAccount, UserId, UserSummary};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

/// User store including favorites and received recommendations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user record with its relations.
    async fn insert(&self, user: &UserAccount) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Fetch a user by normalised e-mail address.
    async fn find_by_email(&self, email: &Email)
    -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Public identity for each existing user among `ids`.
    async fn find_summaries(
        &self,
        ids: &[UserId],
    ) -> Result<Vec<UserSummary>, UserPersistenceError>;

    /// Record a favorite. Already-present pairs are left unchanged.
    async fn add_favorite(
        &self,
        user: &UserId,
        listing: &ListingId,
    ) -> Result<(), UserPersistenceError>;

    /// Remove a favorite. Absent pairs are not an error.
    async fn remove_favorite(
        &self,
        user: &UserId,
        listing: &ListingId,
    ) -> Result<(), UserPersistenceError>;

    /// Append a recommendation to the recipient's log.
    async fn add_recommendation(
        &self,
        recipient: &UserId,
        entry: &Recommendation,
    ) -> Result<(), UserPersistenceError>;
}
