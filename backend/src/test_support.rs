//! Shared test doubles and builders for unit tests.

use std::sync::Mutex;

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    Email, Listing, ListingAttributes, ListingDraft, ListingId, Principal, PropertyType, UserId,
};

/// Clock whose time only moves when a test advances it.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Fixed instant used as the default "now" in tests.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub fn principal(email: &str) -> Principal {
    Principal::new(UserId::random(), Email::new(email).expect("valid email"))
}

/// Attributes of the three-bedroom Austin house used across tests.
pub fn austin_house() -> ListingAttributes {
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

pub fn draft() -> ListingDraft {
    ListingDraft::new(austin_house(), None).expect("valid draft")
}

pub fn listing_owned_by(owner: UserId, created_at: DateTime<Utc>) -> Listing {
    Listing::create(ListingId::random(), owner, draft(), created_at)
}
