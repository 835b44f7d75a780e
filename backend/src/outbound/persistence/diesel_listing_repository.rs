//! PostgreSQL-backed `ListingRepository` implementation using Diesel ORM.
//!
//! Filters are translated into a boxed query with one predicate per populated
//! [`ListingFilter`] field, so the SQL mirrors [`ListingFilter::matches`].

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ListingPersistenceError, ListingRepository};
use crate::domain::{Listing, ListingAttributes, ListingFilter, ListingId, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{ListingChanges, ListingRow, NewListingRow};
use super::pool::DbPool;
use super::schema::listings;

/// Diesel-backed implementation of the `ListingRepository` port.
#[derive(Clone)]
pub struct DieselListingRepository {
    pool: DbPool,
}

impl DieselListingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Escape `LIKE` metacharacters so the fragment matches literally.
fn like_pattern(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len() + 2);
    escaped.push('%');
    for ch in fragment.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn filtered_query(filter: &ListingFilter) -> listings::BoxedQuery<'static, Pg> {
    let mut query = listings::table.into_boxed();
    if let Some(kind) = filter.property_type {
        query = query.filter(listings::property_type.eq(kind.as_str()));
    }
    if let Some(fragment) = filter.location.as_deref() {
        query = query.filter(listings::location.ilike(like_pattern(fragment)));
    }
    if let Some(min) = filter.min_price {
        query = query.filter(listings::price.ge(min));
    }
    if let Some(max) = filter.max_price {
        query = query.filter(listings::price.le(max));
    }
    if let Some(min) = filter.min_bedrooms {
        query = query.filter(listings::bedrooms.ge(min));
    }
    if let Some(min) = filter.min_bathrooms {
        query = query.filter(listings::bathrooms.ge(min));
    }
    if let Some(min) = filter.min_square_footage {
        query = query.filter(listings::square_footage.ge(min));
    }
    if let Some(parking) = filter.parking {
        query = query.filter(listings::parking.eq(parking));
    }
    if let Some(status) = filter.status {
        query = query.filter(listings::status.eq(status.as_str()));
    }
    query
}

fn row_to_listing(row: ListingRow) -> Result<Listing, ListingPersistenceError> {
    let property_type = row.property_type.parse().map_err(|err| {
        ListingPersistenceError::query(format!("listing {}: property type {err}", row.id))
    })?;
    let status = row.status.parse().map_err(|err| {
        ListingPersistenceError::query(format!("listing {}: status {err}", row.id))
    })?;
    let attributes = ListingAttributes {
        property_type,
        price: row.price,
        location: row.location,
        bedrooms: row.bedrooms,
        bathrooms: row.bathrooms,
        square_footage: row.square_footage,
        year_built: row.year_built,
        lot_size: row.lot_size,
        parking: row.parking,
        amenities: row.amenities,
        description: row.description,
        images: row.images,
    };
    Ok(Listing::restore(
        ListingId::from_uuid(row.id),
        UserId::from_uuid(row.owner_id),
        attributes,
        status,
        row.created_at,
        row.updated_at,
    ))
}

fn rows_to_listings(rows: Vec<ListingRow>) -> Result<Vec<Listing>, ListingPersistenceError> {
    rows.into_iter().map(row_to_listing).collect()
}

#[async_trait]
impl ListingRepository for DieselListingRepository {
    async fn insert(&self, listing: &Listing) -> Result<(), ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let attrs = listing.attributes();
        let row = NewListingRow {
            id: *listing.id().as_uuid(),
            owner_id: *listing.owner().as_uuid(),
            property_type: attrs.property_type.as_str(),
            price: attrs.price,
            location: &attrs.location,
            bedrooms: attrs.bedrooms,
            bathrooms: attrs.bathrooms,
            square_footage: attrs.square_footage,
            year_built: attrs.year_built,
            lot_size: attrs.lot_size,
            parking: attrs.parking,
            amenities: &attrs.amenities,
            description: &attrs.description,
            images: &attrs.images,
            status: listing.status().as_str(),
            created_at: listing.created_at(),
            updated_at: listing.updated_at(),
        };

        diesel::insert_into(listings::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ListingRow> = listings::table
            .find(id.as_uuid())
            .select(ListingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_listing).transpose()
    }

    async fn find_many(&self, ids: &[ListingId]) -> Result<Vec<Listing>, ListingPersistenceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();

        let rows: Vec<ListingRow> = listings::table
            .filter(listings::id.eq_any(uuids))
            .select(ListingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_listings(rows)
    }

    async fn list(&self, filter: &ListingFilter) -> Result<Vec<Listing>, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ListingRow> = filtered_query(filter)
            .order(listings::created_at.desc())
            .select(ListingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_listings(rows)
    }

    async fn update(&self, listing: &Listing) -> Result<bool, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let attrs = listing.attributes();
        let changes = ListingChanges {
            property_type: attrs.property_type.as_str(),
            price: attrs.price,
            location: &attrs.location,
            bedrooms: attrs.bedrooms,
            bathrooms: attrs.bathrooms,
            square_footage: attrs.square_footage,
            year_built: attrs.year_built,
            lot_size: attrs.lot_size,
            parking: attrs.parking,
            amenities: &attrs.amenities,
            description: &attrs.description,
            images: &attrs.images,
            status: listing.status().as_str(),
            updated_at: listing.updated_at(),
        };

        let affected = diesel::update(listings::table.find(listing.id().as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }

    async fn delete(&self, id: &ListingId) -> Result<bool, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::delete(listings::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }
}
