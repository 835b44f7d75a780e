//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{favorites, listings, recommendations, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
}

/// Row struct for reading from the listings table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = listings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ListingRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub property_type: String,
    pub price: f64,
    pub location: String,
    pub bedrooms: i32,
    pub bathrooms: f64,
    pub square_footage: i32,
    pub year_built: i32,
    pub lot_size: f64,
    pub parking: bool,
    pub amenities: Vec<String>,
    pub description: String,
    pub images: Vec<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable and changeset form of a listing.
///
/// `owner_id` and `created_at` are skipped by updates through
/// [`ListingChanges`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = listings)]
pub(crate) struct NewListingRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub property_type: &'a str,
    pub price: f64,
    pub location: &'a str,
    pub bedrooms: i32,
    pub bathrooms: f64,
    pub square_footage: i32,
    pub year_built: i32,
    pub lot_size: f64,
    pub parking: bool,
    pub amenities: &'a [String],
    pub description: &'a str,
    pub images: &'a [String],
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset applied by listing updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = listings)]
pub(crate) struct ListingChanges<'a> {
    pub property_type: &'a str,
    pub price: f64,
    pub location: &'a str,
    pub bedrooms: i32,
    pub bathrooms: f64,
    pub square_footage: i32,
    pub year_built: i32,
    pub lot_size: f64,
    pub parking: bool,
    pub amenities: &'a [String],
    pub description: &'a str,
    pub images: &'a [String],
    pub status: &'a str,
    pub updated_at: DateTime<Utc>,
}

/// Insertable favorite; `position` is assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = favorites)]
pub(crate) struct NewFavoriteRow {
    pub user_id: Uuid,
    pub listing_id: Uuid,
}

/// Row struct for reading and inserting recommendations.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = recommendations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecommendationRow {
    pub recipient_id: Uuid,
    pub listing_id: Uuid,
    pub sender_id: Uuid,
    pub recommended_at: DateTime<Utc>,
}
