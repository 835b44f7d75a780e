//! Application harness for HTTP integration tests.
//!
//! Wires the real services over in-memory adapters and a clock that only
//! moves when a test advances it, and mints genuine bearer tokens.

use std::sync::{Arc, Mutex};

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::test::TestRequest;
use actix_web::{App, web};
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;
use serde_json::{Value, json};

use listings::domain::ports::UserRepository;
use listings::domain::{Email, UserAccount, UserId};
use listings::inbound::http::health::HealthState;
use listings::outbound::auth::{JwtSecret, JwtTokenIssuer};
use listings::server::{Adapters, build_app, build_state_from};

/// Clock whose time only moves when a test advances it.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        let mut now = self.0.lock().expect("clock mutex");
        *now += TimeDelta::seconds(seconds);
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().expect("clock mutex")
    }
}

/// A registered caller and their bearer token.
pub struct Caller {
    pub id: UserId,
    pub email: String,
    pub token: String,
}

impl Caller {
    /// Attach this caller's `Authorization` header.
    pub fn authorize(&self, request: TestRequest) -> TestRequest {
        request.insert_header((header::AUTHORIZATION, format!("Bearer {}", self.token)))
    }
}

pub struct Harness {
    pub clock: Arc<MutableClock>,
    pub adapters: Adapters,
    pub health: web::Data<HealthState>,
    secret: JwtSecret,
}

impl Harness {
    pub fn new() -> Self {
        // Tokens are verified against wall-clock time, so start from it.
        let clock = Arc::new(MutableClock::starting_at(Utc::now()));
        Self {
            adapters: Adapters::in_memory(clock.clone()),
            clock,
            health: web::Data::new(HealthState::new()),
            secret: JwtSecret::new("integration-secret"),
        }
    }

    /// Register `email` directly in the user store and mint a token for it.
    pub async fn register(&self, email: &str) -> Caller {
        let account = UserAccount::new(UserId::random(), Email::new(email).expect("valid email"));
        self.adapters
            .users
            .insert(&account)
            .await
            .expect("insert user");
        let token = JwtTokenIssuer::new(&self.secret, self.clock.clone())
            .issue(account.id())
            .expect("sign token");
        Caller {
            id: account.id(),
            email: email.to_owned(),
            token,
        }
    }

    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl actix_web::body::MessageBody + use<>>,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let state = build_state_from(self.adapters.clone(), &self.secret);
        build_app(self.health.clone(), web::Data::new(state))
    }
}

/// Body of a valid listing creation request.
pub fn house_payload(location: &str, price: f64) -> Value {
    json!({
        "propertyType": "house",
        "price": price,
        "location": location,
        "bedrooms": 3,
        "bathrooms": 2,
        "squareFootage": 1800,
        "yearBuilt": 2010,
        "lotSize": 5000,
        "description": "Three-bedroom family home",
    })
}
