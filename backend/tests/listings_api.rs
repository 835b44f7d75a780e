//! End-to-end behaviour of the listing endpoints.

#[path = "support/app.rs"]
mod app_support;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use app_support::{Harness, house_payload};
use rstest::rstest;
use serde_json::{Value, json};

#[rstest]
#[actix_web::test]
async fn owner_lifecycle_and_foreign_delete() {
    let harness = Harness::new();
    let owner = harness.register("owner@example.com").await;
    let stranger = harness.register("stranger@example.com").await;
    let app = test::init_service(harness.app()).await;

    let created = test::call_service(
        &app,
        owner
            .authorize(TestRequest::post().uri("/api/listings"))
            .set_json(house_payload("Austin", 250_000.0))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(created).await;
    let id = created["id"].as_str().expect("listing id").to_owned();
    assert_eq!(created["status"], "available");
    assert_eq!(created["createdBy"]["email"], owner.email);

    let fetched = test::call_service(
        &app,
        TestRequest::get()
            .uri(&format!("/api/listings/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(fetched.status(), StatusCode::OK);
    let fetched: Value = test::read_body_json(fetched).await;
    assert_eq!(fetched["location"], "Austin");

    let forbidden = test::call_service(
        &app,
        stranger
            .authorize(TestRequest::delete().uri(&format!("/api/listings/{id}")))
            .to_request(),
    )
    .await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let removed = test::call_service(
        &app,
        owner
            .authorize(TestRequest::delete().uri(&format!("/api/listings/{id}")))
            .to_request(),
    )
    .await;
    assert_eq!(removed.status(), StatusCode::OK);
    let removed: Value = test::read_body_json(removed).await;
    assert_eq!(removed, json!({ "message": "Property removed" }));

    let gone = test::call_service(
        &app,
        TestRequest::get()
            .uri(&format!("/api/listings/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn update_by_owner_changes_only_sent_fields() {
    let harness = Harness::new();
    let owner = harness.register("owner@example.com").await;
    let app = test::init_service(harness.app()).await;

    let created: Value = test::call_and_read_body_json(
        &app,
        owner
            .authorize(TestRequest::post().uri("/api/listings"))
            .set_json(house_payload("Austin", 250_000.0))
            .to_request(),
    )
    .await;
    let id = created["id"].as_str().expect("listing id").to_owned();

    harness.clock.advance_seconds(60);
    let updated = test::call_service(
        &app,
        owner
            .authorize(TestRequest::put().uri(&format!("/api/listings/{id}")))
            .set_json(json!({ "price": 240000, "status": "pending" }))
            .to_request(),
    )
    .await;
    assert_eq!(updated.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(updated).await;
    assert_eq!(updated["price"], 240_000.0);
    assert_eq!(updated["status"], "pending");
    assert_eq!(updated["location"], "Austin");
    assert_ne!(updated["updatedAt"], created["updatedAt"]);
    assert_eq!(updated["createdAt"], created["createdAt"]);
}

#[rstest]
#[actix_web::test]
async fn filters_narrow_the_public_list() {
    let harness = Harness::new();
    let owner = harness.register("owner@example.com").await;
    let app = test::init_service(harness.app()).await;

    for (location, price) in [("Austin", 250_000.0), ("Dallas", 400_000.0), ("Austin", 900_000.0)] {
        let response = test::call_service(
            &app,
            owner
                .authorize(TestRequest::post().uri("/api/listings"))
                .set_json(house_payload(location, price))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let matched: Vec<Value> = test::call_and_read_body_json(
        &app,
        TestRequest::get()
            .uri("/api/listings?location=austin&maxPrice=500000")
            .to_request(),
    )
    .await;
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0]["price"], 250_000.0);

    let everything: Vec<Value> = test::call_and_read_body_json(
        &app,
        TestRequest::get().uri("/api/listings").to_request(),
    )
    .await;
    assert_eq!(everything.len(), 3);
}

#[rstest]
#[case(TestRequest::post().uri("/api/listings"))]
#[case(TestRequest::put().uri("/api/listings/3fa85f64-5717-4562-b3fc-2c963f66afa6"))]
#[case(TestRequest::delete().uri("/api/listings/3fa85f64-5717-4562-b3fc-2c963f66afa6"))]
#[actix_web::test]
async fn mutations_require_a_token(#[case] request: TestRequest) {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;

    let response = test::call_service(
        &app,
        request.set_json(house_payload("Austin", 1.0)).to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "Please authenticate.");
}

#[rstest]
#[actix_web::test]
async fn token_for_deleted_account_is_rejected() {
    let harness = Harness::new();
    let caller = harness.register("ghost@example.com").await;
    let other = Harness::new();
    let app = test::init_service(other.app()).await;

    // Same secret, but the subject is unknown to this store.
    let response = test::call_service(
        &app,
        caller
            .authorize(TestRequest::post().uri("/api/listings"))
            .set_json(house_payload("Austin", 1.0))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
