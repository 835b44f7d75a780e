//! Listing aggregate and its serialisation contract.
//!
//! A [`Listing`] is created from a validated [`ListingDraft`] and stamped with
//! its owner exactly once. [`ListingPatch`] carries no owner field, so an
//! update can never reassign ownership.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Error;
use super::user::{Email, UserId};

/// Stable listing identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(Uuid);

impl ListingId {
    /// Generate a new random [`ListingId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ListingId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Classification of a listed property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    /// Detached house.
    House,
    /// Apartment unit.
    Apartment,
    /// Condominium unit.
    Condo,
    /// Townhouse.
    Townhouse,
    /// Bare land.
    Land,
}

impl PropertyType {
    /// Wire and storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::House => "house",
            Self::Apartment => "apartment",
            Self::Condo => "condo",
            Self::Townhouse => "townhouse",
            Self::Land => "land",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known enumeration member.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised value: {value}")]
pub struct UnknownVariant {
    /// Rejected input.
    pub value: String,
}

impl FromStr for PropertyType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "house" => Ok(Self::House),
            "apartment" => Ok(Self::Apartment),
            "condo" => Ok(Self::Condo),
            "townhouse" => Ok(Self::Townhouse),
            "land" => Ok(Self::Land),
            other => Err(UnknownVariant {
                value: other.to_owned(),
            }),
        }
    }
}

/// Market status of a listing.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    /// On the market.
    #[default]
    Available,
    /// Under offer.
    Pending,
    /// Sold.
    Sold,
}

impl ListingStatus {
    /// Wire and storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Pending => "pending",
            Self::Sold => "sold",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "pending" => Ok(Self::Pending),
            "sold" => Ok(Self::Sold),
            other => Err(UnknownVariant {
                value: other.to_owned(),
            }),
        }
    }
}

/// Validation failures for listing attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingValidationError {
    /// A numeric attribute was negative or not finite.
    Negative { field: &'static str },
    /// A required text attribute was blank.
    Blank { field: &'static str },
}

impl ListingValidationError {
    /// Wire name of the offending field.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Negative { field } | Self::Blank { field } => field,
        }
    }
}

impl fmt::Display for ListingValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negative { field } => write!(f, "{field} must be a non-negative number"),
            Self::Blank { field } => write!(f, "{field} must not be empty"),
        }
    }
}

impl std::error::Error for ListingValidationError {}

impl From<ListingValidationError> for Error {
    fn from(value: ListingValidationError) -> Self {
        let code = match value {
            ListingValidationError::Negative { .. } => "negative_value",
            ListingValidationError::Blank { .. } => "blank_value",
        };
        Error::invalid_request(value.to_string()).with_details(json!({
            "field": value.field(),
            "code": code,
        }))
    }
}

/// Descriptive attributes shared by drafts and stored listings.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingAttributes {
    pub property_type: PropertyType,
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
}

fn non_negative_float(value: f64, field: &'static str) -> Result<(), ListingValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ListingValidationError::Negative { field })
    }
}

fn non_negative_int(value: i32, field: &'static str) -> Result<(), ListingValidationError> {
    if value >= 0 {
        Ok(())
    } else {
        Err(ListingValidationError::Negative { field })
    }
}

fn non_blank(value: &str, field: &'static str) -> Result<(), ListingValidationError> {
    if value.trim().is_empty() {
        Err(ListingValidationError::Blank { field })
    } else {
        Ok(())
    }
}

impl ListingAttributes {
    /// Check numeric ranges and required text.
    ///
    /// Field names in the returned error use the camelCase wire spelling.
    pub fn validate(&self) -> Result<(), ListingValidationError> {
        non_negative_float(self.price, "price")?;
        non_blank(&self.location, "location")?;
        non_negative_int(self.bedrooms, "bedrooms")?;
        non_negative_float(self.bathrooms, "bathrooms")?;
        non_negative_int(self.square_footage, "squareFootage")?;
        non_negative_float(self.lot_size, "lotSize")?;
        non_blank(&self.description, "description")?;
        Ok(())
    }
}

/// Validated input for creating a listing.
///
/// ## Invariants
/// - Attributes satisfy [`ListingAttributes::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDraft {
    attributes: ListingAttributes,
    status: ListingStatus,
}

impl ListingDraft {
    /// Validate attributes and build a draft.
    pub fn new(
        attributes: ListingAttributes,
        status: Option<ListingStatus>,
    ) -> Result<Self, ListingValidationError> {
        attributes.validate()?;
        Ok(Self {
            attributes,
            status: status.unwrap_or_default(),
        })
    }

    /// Attributes supplied by the caller.
    pub fn attributes(&self) -> &ListingAttributes {
        &self.attributes
    }

    /// Initial status; defaults to available.
    pub fn status(&self) -> ListingStatus {
        self.status
    }
}

/// Partial update for a listing. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingPatch {
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

/// Stored listing.
///
/// ## Invariants
/// - `owner` is set at creation and never changes.
/// - `updated_at >= created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    id: ListingId,
    owner: UserId,
    attributes: ListingAttributes,
    status: ListingStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Listing {
    /// Stamp a draft with identity, owner, and creation time.
    pub fn create(id: ListingId, owner: UserId, draft: ListingDraft, now: DateTime<Utc>) -> Self {
        let ListingDraft { attributes, status } = draft;
        Self {
            id,
            owner,
            attributes,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rehydrate a listing from storage.
    pub fn restore(
        id: ListingId,
        owner: UserId,
        attributes: ListingAttributes,
        status: ListingStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner,
            attributes,
            status,
            created_at,
            updated_at,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> ListingId {
        self.id
    }

    /// Account allowed to update or delete the listing.
    pub fn owner(&self) -> UserId {
        self.owner
    }

    /// Validated descriptive fields.
    pub fn attributes(&self) -> &ListingAttributes {
        &self.attributes
    }

    /// Availability state.
    pub fn status(&self) -> ListingStatus {
        self.status
    }

    /// Creation instant, fixed for the listing's lifetime.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Instant of the last applied patch.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Apply a patch, returning the updated listing when the result is valid.
    ///
    /// The receiver is left untouched when validation fails.
    pub fn apply(&self, patch: ListingPatch, now: DateTime<Utc>) -> Result<Self, ListingValidationError> {
        let mut attributes = self.attributes.clone();
        let ListingPatch {
            property_type,
            price,
            location,
            bedrooms,
            bathrooms,
            square_footage,
            year_built,
            lot_size,
            parking,
            amenities,
            description,
            images,
            status,
        } = patch;

        if let Some(value) = property_type {
            attributes.property_type = value;
        }
        if let Some(value) = price {
            attributes.price = value;
        }
        if let Some(value) = location {
            attributes.location = value;
        }
        if let Some(value) = bedrooms {
            attributes.bedrooms = value;
        }
        if let Some(value) = bathrooms {
            attributes.bathrooms = value;
        }
        if let Some(value) = square_footage {
            attributes.square_footage = value;
        }
        if let Some(value) = year_built {
            attributes.year_built = value;
        }
        if let Some(value) = lot_size {
            attributes.lot_size = value;
        }
        if let Some(value) = parking {
            attributes.parking = value;
        }
        if let Some(value) = amenities {
            attributes.amenities = value;
        }
        if let Some(value) = description {
            attributes.description = value;
        }
        if let Some(value) = images {
            attributes.images = value;
        }
        attributes.validate()?;

        Ok(Self {
            id: self.id,
            owner: self.owner,
            attributes,
            status: status.unwrap_or(self.status),
            created_at: self.created_at,
            updated_at: now.max(self.created_at),
        })
    }
}

/// Public identity embedded in listing and recommendation responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: UserId,
    #[schema(value_type = String, example = "owner@example.com")]
    pub email: Email,
}

/// Listing as returned to clients and stored in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingView {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: ListingId,
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
    pub parking: bool,
    pub amenities: Vec<String>,
    pub description: String,
    pub images: Vec<String>,
    pub status: ListingStatus,
    /// Owner's public identity; `None` when the owner record is missing.
    pub created_by: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ListingView {
    /// Combine a listing with its owner's public details.
    pub fn new(listing: &Listing, created_by: Option<UserSummary>) -> Self {
        let attributes = listing.attributes().clone();
        Self {
            id: listing.id(),
            property_type: attributes.property_type,
            price: attributes.price,
            location: attributes.location,
            bedrooms: attributes.bedrooms,
            bathrooms: attributes.bathrooms,
            square_footage: attributes.square_footage,
            year_built: attributes.year_built,
            lot_size: attributes.lot_size,
            parking: attributes.parking,
            amenities: attributes.amenities,
            description: attributes.description,
            images: attributes.images,
            status: listing.status(),
            created_by,
            created_at: listing.created_at(),
            updated_at: listing.updated_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn attributes() -> ListingAttributes {
        ListingAttributes {
            property_type: PropertyType::House,
            price: 250_000.0,
            location: "Austin".to_owned(),
            bedrooms: 3,
            bathrooms: 2.0,
            square_footage: 1800,
            year_built: 2010,
            lot_size: 5000.0,
            parking: false,
            amenities: Vec::new(),
            description: "nice".to_owned(),
            images: Vec::new(),
        }
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    fn draft_defaults_status_to_available(attributes: ListingAttributes) {
        let draft = ListingDraft::new(attributes, None).expect("valid draft");
        assert_eq!(draft.status(), ListingStatus::Available);
    }

    #[rstest]
    #[case::price(|a: &mut ListingAttributes| a.price = -1.0, "price")]
    #[case::bedrooms(|a: &mut ListingAttributes| a.bedrooms = -1, "bedrooms")]
    #[case::bathrooms(|a: &mut ListingAttributes| a.bathrooms = f64::NAN, "bathrooms")]
    #[case::square_footage(|a: &mut ListingAttributes| a.square_footage = -5, "squareFootage")]
    #[case::lot_size(|a: &mut ListingAttributes| a.lot_size = -0.5, "lotSize")]
    #[case::location(|a: &mut ListingAttributes| a.location = "  ".to_owned(), "location")]
    #[case::description(|a: &mut ListingAttributes| a.description.clear(), "description")]
    fn draft_rejects_invalid_attributes(
        mut attributes: ListingAttributes,
        #[case] mutate: fn(&mut ListingAttributes),
        #[case] field: &str,
    ) {
        mutate(&mut attributes);
        let err = ListingDraft::new(attributes, None).expect_err("invalid draft");
        assert_eq!(err.field(), field);
    }

    #[rstest]
    fn apply_keeps_owner_and_creation_time(attributes: ListingAttributes) {
        let owner = UserId::random();
        let draft = ListingDraft::new(attributes, None).expect("valid draft");
        let listing = Listing::create(ListingId::random(), owner, draft, at(1));

        let patch = ListingPatch {
            price: Some(300_000.0),
            status: Some(ListingStatus::Pending),
            ..ListingPatch::default()
        };
        let updated = listing.apply(patch, at(2)).expect("valid patch");

        assert_eq!(updated.owner(), owner);
        assert_eq!(updated.created_at(), at(1));
        assert_eq!(updated.updated_at(), at(2));
        assert_eq!(updated.status(), ListingStatus::Pending);
        assert!((updated.attributes().price - 300_000.0).abs() < f64::EPSILON);
        assert_eq!(updated.attributes().location, "Austin");
    }

    #[rstest]
    fn apply_rejects_invalid_result(attributes: ListingAttributes) {
        let draft = ListingDraft::new(attributes, None).expect("valid draft");
        let listing = Listing::create(ListingId::random(), UserId::random(), draft, at(1));
        let patch = ListingPatch {
            price: Some(-10.0),
            ..ListingPatch::default()
        };
        assert!(listing.apply(patch, at(2)).is_err());
    }

    #[rstest]
    #[case("house", PropertyType::House)]
    #[case("townhouse", PropertyType::Townhouse)]
    #[case("land", PropertyType::Land)]
    fn property_type_parses_wire_names(#[case] raw: &str, #[case] expected: PropertyType) {
        assert_eq!(raw.parse::<PropertyType>(), Ok(expected));
        assert_eq!(expected.as_str(), raw);
    }

    #[rstest]
    fn status_rejects_unknown_values() {
        assert!("archived".parse::<ListingStatus>().is_err());
    }
}
