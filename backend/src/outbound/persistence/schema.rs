//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` when a migration changes a table.

diesel::table! {
    /// Registered users. `email` is stored lowercase and is unique.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Property listings.
    listings (id) {
        id -> Uuid,
        owner_id -> Uuid,
        property_type -> Varchar,
        price -> Float8,
        location -> Text,
        bedrooms -> Int4,
        bathrooms -> Float8,
        square_footage -> Int4,
        year_built -> Int4,
        lot_size -> Float8,
        parking -> Bool,
        amenities -> Array<Text>,
        description -> Text,
        images -> Array<Text>,
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Favorite listings per user; `position` preserves insertion order.
    favorites (user_id, listing_id) {
        user_id -> Uuid,
        listing_id -> Uuid,
        position -> Int8,
    }
}

diesel::table! {
    /// Received recommendations, unique per (recipient, listing, sender).
    recommendations (recipient_id, listing_id, sender_id) {
        recipient_id -> Uuid,
        listing_id -> Uuid,
        sender_id -> Uuid,
        recommended_at -> Timestamptz,
    }
}

diesel::joinable!(listings -> users (owner_id));
diesel::joinable!(favorites -> listings (listing_id));

diesel::allow_tables_to_appear_in_same_query!(users, listings, favorites, recommendations);
