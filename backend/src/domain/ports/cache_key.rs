//! Cache key type and the key scheme shared by cache adapters.
//!
//! | entry | key |
//! |---|---|
//! | unfiltered listing collection | `listings:all` |
//! | filtered listing collection | `listings:v1:<sha256>` |
//! | single listing | `listing:<id>` |
//! | user favorites | `user:<id>:favorites` |
//! | user recommendations | `user:<id>:recommendations` |
use thiserror::Error;

use crate::domain::{ListingFilter, ListingId, UserId};

/// Validated cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Construct a cache key after validating that it is non-empty and trimmed.
    ///
    /// # Examples
    /// ```
    /// use listings::domain::ports::CacheKey;
    ///
    /// let key = CacheKey::new("listing:abc").expect("valid key");
    /// assert_eq!(key.as_str(), "listing:abc");
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, CacheKeyValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(CacheKeyValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(CacheKeyValidationError::ContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// Key for the unfiltered listing collection.
    pub fn all_listings() -> Self {
        Self("listings:all".to_owned())
    }

    /// Key for a listing collection query.
    ///
    /// An empty filter shares the unfiltered collection key, so mutations
    /// that invalidate [`CacheKey::all_listings`] also cover it.
    pub fn listings(filter: &ListingFilter) -> Self {
        if filter.is_empty() {
            Self::all_listings()
        } else {
            Self(format!("listings:v1:{}", filter.fingerprint()))
        }
    }

    /// Key for a single listing.
    pub fn listing(id: ListingId) -> Self {
        Self(format!("listing:{id}"))
    }

    /// Key for a user's expanded favorites.
    pub fn user_favorites(id: UserId) -> Self {
        Self(format!("user:{id}:favorites"))
    }

    /// Key for a user's expanded recommendations.
    pub fn user_recommendations(id: UserId) -> Self {
        Self(format!("user:{id}:recommendations"))
    }

    /// Borrow the underlying key as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Validation errors returned when constructing [`CacheKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheKeyValidationError {
    /// Key is empty after trimming whitespace.
    #[error("cache key must not be empty")]
    Empty,
    /// Key contains leading or trailing whitespace.
    #[error("cache key must not contain surrounding whitespace")]
    ContainsWhitespace,
}

#[cfg(test)]
mod tests {
    //! Validates cache key parsing and the key scheme.
    use super::{CacheKey, CacheKeyValidationError};
    use crate::domain::{ListingFilter, ListingId, PropertyType, UserId};
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn cache_key_rejects_blank(#[case] value: &str) {
        let err = CacheKey::new(value).expect_err("blank keys rejected");
        assert_eq!(err, CacheKeyValidationError::Empty);
    }

    #[rstest]
    #[case(" leading")]
    #[case("trailing ")]
    fn cache_key_rejects_whitespace_padding(#[case] value: &str) {
        let err = CacheKey::new(value).expect_err("padded key rejected");
        assert_eq!(err, CacheKeyValidationError::ContainsWhitespace);
    }

    #[rstest]
    fn empty_filter_uses_collection_key() {
        assert_eq!(
            CacheKey::listings(&ListingFilter::default()),
            CacheKey::all_listings()
        );
    }

    #[rstest]
    fn filtered_key_is_namespaced_hash() {
        let filter = ListingFilter {
            property_type: Some(PropertyType::House),
            ..ListingFilter::default()
        };
        let key = CacheKey::listings(&filter);
        let hash = key
            .as_str()
            .strip_prefix("listings:v1:")
            .expect("namespaced key");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[rstest]
    fn entity_and_user_keys_follow_scheme() {
        let listing = ListingId::random();
        let user = UserId::random();
        assert_eq!(CacheKey::listing(listing).as_str(), format!("listing:{listing}"));
        assert_eq!(
            CacheKey::user_favorites(user).as_str(),
            format!("user:{user}:favorites")
        );
        assert_eq!(
            CacheKey::user_recommendations(user).to_string(),
            format!("user:{user}:recommendations")
        );
    }
}
