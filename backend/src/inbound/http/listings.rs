//! Listing catalog HTTP handlers.
//!
//! ```text
//! POST   /api/listings
//! GET    /api/listings?propertyType=house&minPrice=100000
//! GET    /api/listings/{id}
//! PUT    /api/listings/{id}
//! DELETE /api/listings/{id}
//! ```
//!
//! Request bodies never carry an owner: any `createdBy` or `owner` key sent
//! by a client is ignored during deserialisation.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Error, ListingAttributes, ListingDraft, ListingFilter, ListingPatch, ListingStatus,
    ListingView, PropertyType,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::MessageResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_listing_id, parse_optional, parse_optional_finite,
};

/// Request body for `POST /api/listings`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    pub property_type: PropertyType,
    #[schema(example = 250000.0)]
    pub price: f64,
    #[schema(example = "Austin")]
    pub location: String,
    pub bedrooms: i32,
    pub bathrooms: f64,
    pub square_footage: i32,
    pub year_built: i32,
    pub lot_size: f64,
    #[serde(default)]
    pub parking: bool,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub status: Option<ListingStatus>,
}

impl TryFrom<CreateListingRequest> for ListingDraft {
    type Error = Error;

    fn try_from(value: CreateListingRequest) -> Result<Self, Self::Error> {
        let attributes = ListingAttributes {
            property_type: value.property_type,
            price: value.price,
            location: value.location,
            bedrooms: value.bedrooms,
            bathrooms: value.bathrooms,
            square_footage: value.square_footage,
            year_built: value.year_built,
            lot_size: value.lot_size,
            parking: value.parking,
            amenities: value.amenities,
            description: value.description,
            images: value.images,
        };
        Ok(ListingDraft::new(attributes, value.status)?)
    }
}

/// Request body for `PUT /api/listings/{id}`. Absent fields are unchanged.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListingRequest {
    pub property_type: Option<PropertyType>,
    pub price: Option<f64>,
    pub location: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<f64>,
    pub square_footage: Option<i32>,
    pub year_built: Option<i32>,
    pub lot_size: Option<f64>,
    pub parking: Option<bool>,
    pub amenities: Option<Vec<String>>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub status: Option<ListingStatus>,
}

impl From<UpdateListingRequest> for ListingPatch {
    fn from(value: UpdateListingRequest) -> Self {
        Self {
            property_type: value.property_type,
            price: value.price,
            location: value.location,
            bedrooms: value.bedrooms,
            bathrooms: value.bathrooms,
            square_footage: value.square_footage,
            year_built: value.year_built,
            lot_size: value.lot_size,
            parking: value.parking,
            amenities: value.amenities,
            description: value.description,
            images: value.images,
            status: value.status,
        }
    }
}

/// Query options for `GET /api/listings`.
///
/// Values arrive as strings so a malformed option is reported with its
/// field name. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ListingQuery {
    /// One of `house`, `apartment`, `condo`, `townhouse`, `land`.
    pub property_type: Option<String>,
    /// Case-insensitive substring of the location.
    pub location: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_bedrooms: Option<String>,
    pub min_bathrooms: Option<String>,
    pub min_square_footage: Option<String>,
    /// `true` or `false`.
    pub parking: Option<String>,
    /// One of `available`, `pending`, `sold`.
    pub status: Option<String>,
}

impl TryFrom<ListingQuery> for ListingFilter {
    type Error = Error;

    fn try_from(query: ListingQuery) -> Result<Self, Self::Error> {
        let filter = ListingFilter {
            property_type: parse_optional(
                query.property_type.as_deref(),
                FieldName::new("propertyType"),
            )?,
            location: None,
            min_price: parse_optional_finite(
                query.min_price.as_deref(),
                FieldName::new("minPrice"),
            )?,
            max_price: parse_optional_finite(
                query.max_price.as_deref(),
                FieldName::new("maxPrice"),
            )?,
            min_bedrooms: parse_optional(
                query.min_bedrooms.as_deref(),
                FieldName::new("minBedrooms"),
            )?,
            min_bathrooms: parse_optional_finite(
                query.min_bathrooms.as_deref(),
                FieldName::new("minBathrooms"),
            )?,
            min_square_footage: parse_optional(
                query.min_square_footage.as_deref(),
                FieldName::new("minSquareFootage"),
            )?,
            parking: parse_optional(query.parking.as_deref(), FieldName::new("parking"))?,
            status: parse_optional(query.status.as_deref(), FieldName::new("status"))?,
        };
        Ok(match query.location {
            Some(location) => filter.with_location(location),
            None => filter,
        })
    }
}

/// Create a listing owned by the caller.
#[utoipa::path(
    post,
    path = "/api/listings",
    request_body = CreateListingRequest,
    responses(
        (status = 201, description = "Listing created", body = ListingView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["listings"],
    operation_id = "createListing",
    security(("BearerAuth" = []))
)]
#[post("/listings")]
pub async fn create_listing(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<CreateListingRequest>,
) -> ApiResult<HttpResponse> {
    let draft = ListingDraft::try_from(payload.into_inner())?;
    let created = state.catalog.create(caller.principal(), draft).await?;
    Ok(HttpResponse::Created().json(created))
}

/// List listings matching the query, newest first.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use listings::inbound::http::listings::list_listings;
///
/// let app = App::new().service(list_listings);
/// ```
#[utoipa::path(
    get,
    path = "/api/listings",
    params(ListingQuery),
    responses(
        (status = 200, description = "Matching listings", body = [ListingView]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["listings"],
    operation_id = "listListings",
    security([])
)]
#[get("/listings")]
pub async fn list_listings(
    state: web::Data<HttpState>,
    query: web::Query<ListingQuery>,
) -> ApiResult<web::Json<Vec<ListingView>>> {
    let filter = ListingFilter::try_from(query.into_inner())?;
    let listings = state.catalog.list(&filter).await?;
    Ok(web::Json(listings))
}

/// Fetch a single listing.
#[utoipa::path(
    get,
    path = "/api/listings/{id}",
    params(("id" = String, Path, description = "Listing identifier")),
    responses(
        (status = 200, description = "Listing", body = ListingView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["listings"],
    operation_id = "getListing",
    security([])
)]
#[get("/listings/{id}")]
pub async fn get_listing(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ListingView>> {
    let id = parse_listing_id(&path, FieldName::new("id"))?;
    let listing = state.catalog.get(&id).await?;
    Ok(web::Json(listing))
}

/// Update a listing owned by the caller.
#[utoipa::path(
    put,
    path = "/api/listings/{id}",
    params(("id" = String, Path, description = "Listing identifier")),
    request_body = UpdateListingRequest,
    responses(
        (status = 200, description = "Updated listing", body = ListingView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller does not own the listing", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["listings"],
    operation_id = "updateListing",
    security(("BearerAuth" = []))
)]
#[put("/listings/{id}")]
pub async fn update_listing(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    payload: web::Json<UpdateListingRequest>,
) -> ApiResult<web::Json<ListingView>> {
    let id = parse_listing_id(&path, FieldName::new("id"))?;
    let patch = ListingPatch::from(payload.into_inner());
    let updated = state.catalog.update(caller.principal(), &id, patch).await?;
    Ok(web::Json(updated))
}

/// Delete a listing owned by the caller.
#[utoipa::path(
    delete,
    path = "/api/listings/{id}",
    params(("id" = String, Path, description = "Listing identifier")),
    responses(
        (status = 200, description = "Listing removed", body = MessageResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller does not own the listing", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["listings"],
    operation_id = "deleteListing",
    security(("BearerAuth" = []))
)]
#[delete("/listings/{id}")]
pub async fn delete_listing(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = parse_listing_id(&path, FieldName::new("id"))?;
    state.catalog.delete(caller.principal(), &id).await?;
    Ok(web::Json(MessageResponse::new("Property removed")))
}

#[cfg(test)]
#[path = "listings_tests.rs"]
mod tests;
