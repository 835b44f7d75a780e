//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define strongly typed listing and user entities, the ports the
//! outside world plugs into, and the services that implement the catalog
//! use-cases on top of those ports. Keep types immutable where possible and
//! document invariants and serialisation contracts in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: API error response payload and stable identifier.
//! - Listing and its value types: owned property records.
//! - UserAccount / Principal: users with favorites and recommendations.
//! - ListingFilter: query criteria over listings.
//! - ListingCatalogService / UserRelationsService: driving port services.

pub mod authorization;
pub mod cache_aside;
pub mod catalog_service;
pub mod error;
pub mod listing;
pub mod listing_filter;
mod listing_service_support;
pub mod ports;
pub mod relations_service;
pub mod trace_id;
pub mod user;

pub use self::authorization::{Authorization, authorize};
pub use self::cache_aside::{CacheAside, SNAPSHOT_TTL};
pub use self::catalog_service::ListingCatalogService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::listing::{
    Listing, ListingAttributes, ListingDraft, ListingId, ListingPatch, ListingStatus,
    ListingValidationError, ListingView, PropertyType, UnknownVariant, UserSummary,
};
pub use self::listing_filter::ListingFilter;
pub use self::relations_service::UserRelationsService;
pub use self::trace_id::TraceId;
pub use self::user::{Email, Principal, Recommendation, UserAccount, UserId, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use listings::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
