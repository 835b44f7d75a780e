//! Favorites and recommendations HTTP handlers.
//!
//! ```text
//! POST   /api/users/favorites/{listingId}
//! DELETE /api/users/favorites/{listingId}
//! GET    /api/users/favorites
//! POST   /api/users/recommend {"listingId":"...","recipientEmail":"buyer@example.com"}
//! GET    /api/users/recommendations
//! ```

use actix_web::{delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{FavoriteOutcome, RecommendOutcome, RecommendationView};
use crate::domain::{Error, ListingId, ListingView};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::MessageResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_listing_id, parse_recipient};

/// Request body for `POST /api/users/recommend`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    #[serde(alias = "propertyId")]
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub listing_id: String,
    #[schema(example = "buyer@example.com")]
    pub recipient_email: String,
}

fn favorite_ids(ids: Vec<ListingId>) -> Vec<String> {
    ids.into_iter().map(|id| id.to_string()).collect()
}

/// Add a listing to the caller's favorites.
///
/// Responds with the caller's favorite listing ids.
#[utoipa::path(
    post,
    path = "/api/users/favorites/{listingId}",
    params(("listingId" = String, Path, description = "Listing identifier")),
    responses(
        (status = 200, description = "Favorite ids after the addition", body = [String]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Listing not found", body = Error),
        (status = 409, description = "Listing is already a favorite", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "addFavorite",
    security(("BearerAuth" = []))
)]
#[post("/users/favorites/{listing_id}")]
pub async fn add_favorite(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<String>>> {
    let listing = parse_listing_id(&path, FieldName::new("listingId"))?;
    match state
        .relations
        .add_favorite(caller.principal(), &listing)
        .await?
    {
        FavoriteOutcome::Added(ids) => Ok(web::Json(favorite_ids(ids))),
        FavoriteOutcome::AlreadyPresent => {
            Err(Error::conflict("Property already in favorites"))
        }
    }
}

/// Remove a listing from the caller's favorites.
///
/// Removing a listing that is not a favorite succeeds without change.
#[utoipa::path(
    delete,
    path = "/api/users/favorites/{listingId}",
    params(("listingId" = String, Path, description = "Listing identifier")),
    responses(
        (status = 200, description = "Remaining favorite ids", body = [String]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "removeFavorite",
    security(("BearerAuth" = []))
)]
#[delete("/users/favorites/{listing_id}")]
pub async fn remove_favorite(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<String>>> {
    let listing = parse_listing_id(&path, FieldName::new("listingId"))?;
    let remaining = state
        .relations
        .remove_favorite(caller.principal(), &listing)
        .await?;
    Ok(web::Json(favorite_ids(remaining)))
}

/// The caller's favorite listings.
#[utoipa::path(
    get,
    path = "/api/users/favorites",
    responses(
        (status = 200, description = "Favorite listings", body = [ListingView]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listFavorites",
    security(("BearerAuth" = []))
)]
#[get("/users/favorites")]
pub async fn list_favorites(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<web::Json<Vec<ListingView>>> {
    let favorites = state.relations.list_favorites(caller.principal()).await?;
    Ok(web::Json(favorites))
}

/// Recommend a listing to another registered user.
#[utoipa::path(
    post,
    path = "/api/users/recommend",
    request_body = RecommendRequest,
    responses(
        (status = 200, description = "Recommendation recorded", body = MessageResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Listing or recipient not found", body = Error),
        (status = 409, description = "Already recommended to this user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "recommendListing",
    security(("BearerAuth" = []))
)]
#[post("/users/recommend")]
pub async fn recommend(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<RecommendRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    let RecommendRequest {
        listing_id,
        recipient_email,
    } = payload.into_inner();
    let listing = parse_listing_id(&listing_id, FieldName::new("listingId"))?;
    let recipient = parse_recipient(&recipient_email)?;

    match state
        .relations
        .recommend(caller.principal(), &listing, &recipient)
        .await?
    {
        RecommendOutcome::Recommended => Ok(web::Json(MessageResponse::new(
            "Property recommended successfully",
        ))),
        RecommendOutcome::AlreadyRecommended => Err(Error::conflict(
            "Property already recommended to this user",
        )),
    }
}

/// Recommendations the caller has received, oldest first.
#[utoipa::path(
    get,
    path = "/api/users/recommendations",
    responses(
        (status = 200, description = "Received recommendations", body = [RecommendationView]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listRecommendations",
    security(("BearerAuth" = []))
)]
#[get("/users/recommendations")]
pub async fn list_recommendations(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<web::Json<Vec<RecommendationView>>> {
    let received = state
        .relations
        .list_recommendations(caller.principal())
        .await?;
    Ok(web::Json(received))
}
