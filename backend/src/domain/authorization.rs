//! Owner-only authorization for listing mutations.
//!
//! The guard is a pure decision over an already-fetched listing. Callers run
//! it after confirming existence, so a missing listing surfaces as not found
//! rather than forbidden.

use super::{Error, Listing, Principal};

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    /// The caller owns the listing.
    Allowed,
    /// The caller is authenticated but not the owner.
    Denied,
}

impl Authorization {
    /// Convert a denial into the domain's forbidden error.
    pub fn into_result(self) -> Result<(), Error> {
        match self {
            Self::Allowed => Ok(()),
            Self::Denied => Err(Error::forbidden("Not authorized")),
        }
    }
}

/// Allow the mutation only when the principal owns the listing.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use listings::domain::{
///     authorize, Authorization, Email, Listing, ListingAttributes, ListingDraft, ListingId,
///     Principal, PropertyType, UserId,
/// };
///
/// let owner = Principal::new(UserId::random(), Email::new("o@example.com").unwrap());
/// let attributes = ListingAttributes {
///     property_type: PropertyType::Land,
///     price: 1.0,
///     location: "Here".into(),
///     bedrooms: 0,
///     bathrooms: 0.0,
///     square_footage: 0,
///     year_built: 2000,
///     lot_size: 1.0,
///     parking: false,
///     amenities: vec![],
///     description: "Plot".into(),
///     images: vec![],
/// };
/// let draft = ListingDraft::new(attributes, None).unwrap();
/// let listing = Listing::create(ListingId::random(), owner.id(), draft, Utc::now());
/// assert_eq!(authorize(&owner, &listing), Authorization::Allowed);
/// ```
pub fn authorize(principal: &Principal, listing: &Listing) -> Authorization {
    if listing.owner() == principal.id() {
        Authorization::Allowed
    } else {
        Authorization::Denied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Email, ErrorCode, ListingAttributes, ListingDraft, ListingId, PropertyType, UserId,
    };
    use chrono::Utc;
    use rstest::{fixture, rstest};

    fn principal(email: &str) -> Principal {
        Principal::new(UserId::random(), Email::new(email).expect("valid email"))
    }

    #[fixture]
    fn owner() -> Principal {
        principal("owner@example.com")
    }

    fn listing_owned_by(owner: &Principal) -> Listing {
        let attributes = ListingAttributes {
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
        };
        let draft = ListingDraft::new(attributes, None).expect("valid draft");
        Listing::create(ListingId::random(), owner.id(), draft, Utc::now())
    }

    #[rstest]
    fn owner_is_allowed(owner: Principal) {
        let listing = listing_owned_by(&owner);
        assert_eq!(authorize(&owner, &listing), Authorization::Allowed);
        assert!(authorize(&owner, &listing).into_result().is_ok());
    }

    #[rstest]
    fn other_principal_is_denied(owner: Principal) {
        let listing = listing_owned_by(&owner);
        let intruder = principal("intruder@example.com");

        let err = authorize(&intruder, &listing)
            .into_result()
            .expect_err("non-owner denied");
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(err.message(), "Not authorized");
    }

    #[rstest]
    fn same_email_different_id_is_denied(owner: Principal) {
        let listing = listing_owned_by(&owner);
        let impostor = Principal::new(UserId::random(), owner.email().clone());
        assert_eq!(authorize(&impostor, &listing), Authorization::Denied);
    }
}
