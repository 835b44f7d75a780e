//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Favorites and recommendations live in their own tables keyed by user.
//! Primary keys enforce the relation uniqueness invariants, and inserts use
//! `ON CONFLICT DO NOTHING` so repeated writes are harmless.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    Email, ListingId, Recommendation, UserAccount, UserId, UserSummary,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewFavoriteRow, NewUserRow, RecommendationRow, UserRow};
use super::pool::DbPool;
use super::schema::{favorites, recommendations, users};

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_summary(row: UserRow) -> Result<UserSummary, UserPersistenceError> {
    let email = Email::new(&row.email)
        .map_err(|err| UserPersistenceError::query(format!("user {}: {err}", row.id)))?;
    Ok(UserSummary {
        id: UserId::from_uuid(row.id),
        email,
    })
}

/// Load the relations of `row` and assemble the account.
async fn hydrate(
    conn: &mut AsyncPgConnection,
    row: UserRow,
) -> Result<UserAccount, UserPersistenceError> {
    let favorite_ids: Vec<Uuid> = favorites::table
        .filter(favorites::user_id.eq(row.id))
        .order(favorites::position.asc())
        .select(favorites::listing_id)
        .load(conn)
        .await
        .map_err(map_diesel_error)?;

    let received: Vec<RecommendationRow> = recommendations::table
        .filter(recommendations::recipient_id.eq(row.id))
        .order(recommendations::recommended_at.asc())
        .select(RecommendationRow::as_select())
        .load(conn)
        .await
        .map_err(map_diesel_error)?;

    let summary = row_to_summary(row)?;
    Ok(UserAccount::restore(
        summary.id,
        summary.email,
        favorite_ids.into_iter().map(ListingId::from_uuid).collect(),
        received
            .into_iter()
            .map(|entry| Recommendation {
                listing: ListingId::from_uuid(entry.listing_id),
                from: UserId::from_uuid(entry.sender_id),
                recommended_at: entry.recommended_at,
            })
            .collect(),
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *account.id().as_uuid(),
            email: account.email().as_str(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        match row {
            Some(row) => hydrate(&mut conn, row).await.map(Some),
            None => Ok(None),
        }
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        match row {
            Some(row) => hydrate(&mut conn, row).await.map(Some),
            None => Ok(None),
        }
    }

    async fn find_summaries(
        &self,
        ids: &[UserId],
    ) -> Result<Vec<UserSummary>, UserPersistenceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();

        let rows: Vec<UserRow> = users::table
            .filter(users::id.eq_any(uuids))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_summary).collect()
    }

    async fn add_favorite(
        &self,
        user: &UserId,
        listing: &ListingId,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewFavoriteRow {
            user_id: *user.as_uuid(),
            listing_id: *listing.as_uuid(),
        };

        diesel::insert_into(favorites::table)
            .values(&row)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn remove_favorite(
        &self,
        user: &UserId,
        listing: &ListingId,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(
            favorites::table
                .filter(favorites::user_id.eq(user.as_uuid()))
                .filter(favorites::listing_id.eq(listing.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map(|_| ())
        .map_err(map_diesel_error)
    }

    async fn add_recommendation(
        &self,
        recipient: &UserId,
        entry: &Recommendation,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = RecommendationRow {
            recipient_id: *recipient.as_uuid(),
            listing_id: *entry.listing.as_uuid(),
            sender_id: *entry.from.as_uuid(),
            recommended_at: entry.recommended_at,
        };

        diesel::insert_into(recommendations::table)
            .values(&row)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn summary_rows_keep_identity_and_email() {
        let id = Uuid::new_v4();
        let summary = row_to_summary(UserRow {
            id,
            email: "owner@example.com".to_owned(),
        })
        .expect("valid row");
        assert_eq!(summary.id.as_uuid(), &id);
        assert_eq!(summary.email.as_str(), "owner@example.com");
    }

    #[rstest]
    fn corrupt_email_is_a_query_error() {
        let err = row_to_summary(UserRow {
            id: Uuid::new_v4(),
            email: "not-an-email".to_owned(),
        })
        .expect_err("invalid email");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }
}
