//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers every listing, favorites,
//! recommendation, and health endpoint, the shared [`Error`] envelope, and
//! the bearer token security scheme.
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::RecommendationView;
use crate::domain::{Error, ErrorCode, ListingStatus, ListingView, PropertyType, UserSummary};
use crate::inbound::http::health::HealthReport;
use crate::inbound::http::listings::{CreateListingRequest, UpdateListingRequest};
use crate::inbound::http::schemas::MessageResponse;
use crate::inbound::http::users::RecommendRequest;

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("HS256 token minted by the issue-token tool."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Property listing API",
        description = "Listing catalog with owner-only mutations, favorites, and recommendations."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::listings::create_listing,
        crate::inbound::http::listings::list_listings,
        crate::inbound::http::listings::get_listing,
        crate::inbound::http::listings::update_listing,
        crate::inbound::http::listings::delete_listing,
        crate::inbound::http::users::add_favorite,
        crate::inbound::http::users::remove_favorite,
        crate::inbound::http::users::list_favorites,
        crate::inbound::http::users::recommend,
        crate::inbound::http::users::list_recommendations,
        crate::inbound::http::health::api_health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        ListingView,
        ListingStatus,
        PropertyType,
        UserSummary,
        RecommendationView,
        CreateListingRequest,
        UpdateListingRequest,
        RecommendRequest,
        MessageResponse,
        HealthReport,
    )),
    tags(
        (name = "listings", description = "Property listing catalog"),
        (name = "users", description = "Favorites and recommendations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema field structure.

    use super::*;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn error_schema_uses_wire_field_names() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get("Error").expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
        assert_object_schema_has_field(error_schema, "traceId");
    }

    #[test]
    fn listing_schema_is_camel_case() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let listing = schemas.get("ListingView").expect("ListingView schema");

        assert_object_schema_has_field(listing, "propertyType");
        assert_object_schema_has_field(listing, "createdBy");
    }

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/listings",
            "/api/listings/{id}",
            "/api/users/favorites",
            "/api/users/favorites/{listingId}",
            "/api/users/recommend",
            "/api/users/recommendations",
            "/api/health",
            "/health/ready",
            "/health/live",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("BearerAuth"));
    }
}
