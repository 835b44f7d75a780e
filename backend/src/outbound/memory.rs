//! Process-local repositories used when no database is configured.
//!
//! Both stores keep their records behind a mutex and honour the same
//! contracts as the Diesel adapters, including relation deduplication and
//! newest-first listing order.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    ListingPersistenceError, ListingRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Email, Listing, ListingFilter, ListingId, Recommendation, UserAccount, UserId, UserSummary,
};

/// In-memory [`ListingRepository`].
#[derive(Default)]
pub struct InMemoryListingRepository {
    store: Mutex<HashMap<ListingId, Listing>>,
}

impl InMemoryListingRepository {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<ListingId, Listing>>, ListingPersistenceError> {
        self.store
            .lock()
            .map_err(|_| ListingPersistenceError::connection("listing store poisoned"))
    }
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    async fn insert(&self, listing: &Listing) -> Result<(), ListingPersistenceError> {
        let mut store = self.lock()?;
        if store.contains_key(&listing.id()) {
            return Err(ListingPersistenceError::query("duplicate record"));
        }
        store.insert(listing.id(), listing.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, ListingPersistenceError> {
        Ok(self.lock()?.get(id).cloned())
    }

    async fn find_many(&self, ids: &[ListingId]) -> Result<Vec<Listing>, ListingPersistenceError> {
        let store = self.lock()?;
        Ok(ids.iter().filter_map(|id| store.get(id).cloned()).collect())
    }

    async fn list(&self, filter: &ListingFilter) -> Result<Vec<Listing>, ListingPersistenceError> {
        let mut matching: Vec<Listing> = self
            .lock()?
            .values()
            .filter(|listing| filter.matches(listing))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(matching)
    }

    async fn update(&self, listing: &Listing) -> Result<bool, ListingPersistenceError> {
        let mut store = self.lock()?;
        match store.get_mut(&listing.id()) {
            Some(slot) => {
                *slot = listing.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &ListingId) -> Result<bool, ListingPersistenceError> {
        Ok(self.lock()?.remove(id).is_some())
    }
}

/// In-memory [`UserRepository`].
#[derive(Default)]
pub struct InMemoryUserRepository {
    store: Mutex<HashMap<UserId, UserAccount>>,
}

impl InMemoryUserRepository {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<UserId, UserAccount>>, UserPersistenceError> {
        self.store
            .lock()
            .map_err(|_| UserPersistenceError::connection("user store poisoned"))
    }

    fn with_account<T>(
        &self,
        id: &UserId,
        apply: impl FnOnce(&mut UserAccount) -> T,
    ) -> Result<T, UserPersistenceError> {
        let mut store = self.lock()?;
        let account = store
            .get_mut(id)
            .ok_or_else(|| UserPersistenceError::query(format!("user {id} not found")))?;
        Ok(apply(account))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut store = self.lock()?;
        let taken = store
            .values()
            .any(|existing| existing.id() == user.id() || existing.email() == user.email());
        if taken {
            return Err(UserPersistenceError::query("duplicate record"));
        }
        store.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserPersistenceError> {
        Ok(self.lock()?.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        Ok(self
            .lock()?
            .values()
            .find(|account| account.email() == email)
            .cloned())
    }

    async fn find_summaries(
        &self,
        ids: &[UserId],
    ) -> Result<Vec<UserSummary>, UserPersistenceError> {
        let store = self.lock()?;
        Ok(ids
            .iter()
            .filter_map(|id| store.get(id))
            .map(|account| account.principal().summary())
            .collect())
    }

    async fn add_favorite(
        &self,
        user: &UserId,
        listing: &ListingId,
    ) -> Result<(), UserPersistenceError> {
        self.with_account(user, |account| {
            account.add_favorite(*listing);
        })
    }

    async fn remove_favorite(
        &self,
        user: &UserId,
        listing: &ListingId,
    ) -> Result<(), UserPersistenceError> {
        self.with_account(user, |account| {
            account.remove_favorite(*listing);
        })
    }

    async fn add_recommendation(
        &self,
        recipient: &UserId,
        entry: &Recommendation,
    ) -> Result<(), UserPersistenceError> {
        self.with_account(recipient, |account| {
            account.receive_recommendation(entry.clone());
        })
    }
}
