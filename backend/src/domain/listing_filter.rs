//! Typed listing query filter and its canonical cache fingerprint.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::listing::{Listing, ListingStatus, PropertyType};

/// Recognised listing query options.
///
/// Each populated field contributes one predicate:
///
/// | field | predicate |
/// |---|---|
/// | `property_type` | exact match |
/// | `location` | case-insensitive substring |
/// | `min_price` / `max_price` | inclusive range |
/// | `min_bedrooms`, `min_bathrooms`, `min_square_footage` | inclusive lower bound |
/// | `parking` | exact match |
/// | `status` | exact match |
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_bedrooms: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_bathrooms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_square_footage: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parking: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ListingStatus>,
}

impl ListingFilter {
    /// Set the location fragment. Blank input clears the option.
    ///
    /// Matching ignores case, so the fragment is stored lowercased and
    /// equivalent spellings share a cache entry.
    #[must_use]
    pub fn with_location(mut self, fragment: impl AsRef<str>) -> Self {
        let trimmed = fragment.as_ref().trim();
        self.location = (!trimmed.is_empty()).then(|| trimmed.to_lowercase());
        self
    }

    /// True when no option is populated.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Evaluate the filter against a listing.
    pub fn matches(&self, listing: &Listing) -> bool {
        let attrs = listing.attributes();
        self.property_type.is_none_or(|value| attrs.property_type == value)
            && self
                .location
                .as_deref()
                .is_none_or(|fragment| {
                    attrs
                        .location
                        .to_lowercase()
                        .contains(&fragment.to_lowercase())
                })
            && self.min_price.is_none_or(|value| attrs.price >= value)
            && self.max_price.is_none_or(|value| attrs.price <= value)
            && self.min_bedrooms.is_none_or(|value| attrs.bedrooms >= value)
            && self.min_bathrooms.is_none_or(|value| attrs.bathrooms >= value)
            && self
                .min_square_footage
                .is_none_or(|value| attrs.square_footage >= value)
            && self.parking.is_none_or(|value| attrs.parking == value)
            && self.status.is_none_or(|value| listing.status() == value)
    }

    /// Lowercase hex SHA-256 over the canonical JSON of the populated options.
    ///
    /// Object keys are sorted recursively and the JSON is compact, so two
    /// filters with the same options always share a fingerprint.
    pub fn fingerprint(&self) -> String {
        let value = serde_json::to_value(self).unwrap_or(Value::Null);
        let canonical = canonicalize(&value);
        let digest = Sha256::digest(canonical.to_string().as_bytes());
        hex::encode(digest)
    }
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by_key(|(k, _)| k.as_str());
            Value::Object(
                sorted
                    .into_iter()
                    .map(|(k, v)| (k.clone(), canonicalize(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::{ListingAttributes, ListingDraft, ListingId};
    use crate::domain::user::UserId;
    use chrono::Utc;
    use rstest::{fixture, rstest};

    #[fixture]
    fn listing() -> Listing {
        let attributes = ListingAttributes {
            property_type: PropertyType::Condo,
            price: 400_000.0,
            location: "Downtown Austin".to_owned(),
            bedrooms: 2,
            bathrooms: 1.5,
            square_footage: 950,
            year_built: 2018,
            lot_size: 0.0,
            parking: true,
            amenities: vec!["gym".to_owned()],
            description: "Corner unit".to_owned(),
            images: Vec::new(),
        };
        let draft = ListingDraft::new(attributes, None).expect("valid draft");
        Listing::create(ListingId::random(), UserId::random(), draft, Utc::now())
    }

    #[rstest]
    fn empty_filter_matches_everything(listing: Listing) {
        let filter = ListingFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&listing));
    }

    #[rstest]
    fn price_bounds_are_inclusive(listing: Listing) {
        let filter = ListingFilter {
            min_price: Some(400_000.0),
            max_price: Some(400_000.0),
            ..ListingFilter::default()
        };
        assert!(filter.matches(&listing));
    }

    #[rstest]
    #[case(ListingFilter { property_type: Some(PropertyType::House), ..ListingFilter::default() })]
    #[case(ListingFilter { max_price: Some(399_999.0), ..ListingFilter::default() })]
    #[case(ListingFilter { min_bedrooms: Some(3), ..ListingFilter::default() })]
    #[case(ListingFilter { min_bathrooms: Some(2.0), ..ListingFilter::default() })]
    #[case(ListingFilter { min_square_footage: Some(1000), ..ListingFilter::default() })]
    #[case(ListingFilter { parking: Some(false), ..ListingFilter::default() })]
    #[case(ListingFilter { status: Some(ListingStatus::Sold), ..ListingFilter::default() })]
    #[case(ListingFilter::default().with_location("dallas"))]
    fn non_matching_predicates_exclude(listing: Listing, #[case] filter: ListingFilter) {
        assert!(!filter.matches(&listing));
    }

    #[rstest]
    fn location_matches_case_insensitive_substring(listing: Listing) {
        let filter = ListingFilter::default().with_location("  AUSTIN ");
        assert_eq!(filter.location.as_deref(), Some("austin"));
        assert!(filter.matches(&listing));
    }

    #[rstest]
    fn blank_location_clears_option() {
        assert!(ListingFilter::default().with_location("   ").is_empty());
    }

    #[rstest]
    fn fingerprint_normalises_location_case() {
        let upper = ListingFilter::default().with_location("Austin");
        let lower = ListingFilter::default().with_location(" austin ");

        assert_eq!(upper.fingerprint(), lower.fingerprint());
        assert_eq!(upper.fingerprint().len(), 64);
    }

    #[rstest]
    fn fingerprint_distinguishes_values() {
        let low = ListingFilter {
            min_price: Some(1.0),
            ..ListingFilter::default()
        };
        let high = ListingFilter {
            min_price: Some(2.0),
            ..ListingFilter::default()
        };
        assert_ne!(low.fingerprint(), high.fingerprint());
    }

    #[rstest]
    fn canonicalize_sorts_nested_keys() {
        let value = serde_json::json!({"b": {"d": 1, "c": 2}, "a": [ {"z": 0, "y": 1} ]});
        assert_eq!(
            canonicalize(&value).to_string(),
            r#"{"a":[{"y":1,"z":0}],"b":{"c":2,"d":1}}"#
        );
    }
}
