//! End-to-end behaviour of favorites and recommendations.

#[path = "support/app.rs"]
mod app_support;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use app_support::{Caller, Harness, house_payload};
use rstest::rstest;
use serde_json::{Value, json};

async fn create_listing<S, B>(app: &S, owner: &Caller) -> String
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let created: Value = test::call_and_read_body_json(
        app,
        owner
            .authorize(TestRequest::post().uri("/api/listings"))
            .set_json(house_payload("Austin", 250_000.0))
            .to_request(),
    )
    .await;
    created["id"].as_str().expect("listing id").to_owned()
}

#[rstest]
#[actix_web::test]
async fn favorites_reject_duplicates_and_survive_removal() {
    let harness = Harness::new();
    let owner = harness.register("owner@example.com").await;
    let fan = harness.register("fan@example.com").await;
    let app = test::init_service(harness.app()).await;
    let id = create_listing(&app, &owner).await;
    let uri = format!("/api/users/favorites/{id}");

    let added = test::call_service(
        &app,
        fan.authorize(TestRequest::post().uri(&uri)).to_request(),
    )
    .await;
    assert_eq!(added.status(), StatusCode::OK);
    let added: Value = test::read_body_json(added).await;
    assert_eq!(added, json!([id]));

    let duplicate = test::call_service(
        &app,
        fan.authorize(TestRequest::post().uri(&uri)).to_request(),
    )
    .await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
    let duplicate: Value = test::read_body_json(duplicate).await;
    assert_eq!(duplicate["message"], "Property already in favorites");

    let favorites: Vec<Value> = test::call_and_read_body_json(
        &app,
        fan.authorize(TestRequest::get().uri("/api/users/favorites"))
            .to_request(),
    )
    .await;
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0]["id"], id.as_str());

    let removed: Value = test::call_and_read_body_json(
        &app,
        fan.authorize(TestRequest::delete().uri(&uri)).to_request(),
    )
    .await;
    assert_eq!(removed, json!([]));

    let favorites: Vec<Value> = test::call_and_read_body_json(
        &app,
        fan.authorize(TestRequest::get().uri("/api/users/favorites"))
            .to_request(),
    )
    .await;
    assert!(favorites.is_empty());
}

#[rstest]
#[actix_web::test]
async fn favoriting_a_missing_listing_is_not_found() {
    let harness = Harness::new();
    let fan = harness.register("fan@example.com").await;
    let app = test::init_service(harness.app()).await;

    let response = test::call_service(
        &app,
        fan.authorize(
            TestRequest::post()
                .uri("/api/users/favorites/3fa85f64-5717-4562-b3fc-2c963f66afa6"),
        )
        .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn recommendations_are_unique_per_sender() {
    let harness = Harness::new();
    let owner = harness.register("owner@example.com").await;
    let alice = harness.register("alice@example.com").await;
    let bob = harness.register("bob@example.com").await;
    let carol = harness.register("carol@example.com").await;
    let app = test::init_service(harness.app()).await;
    let id = create_listing(&app, &owner).await;
    let body = json!({ "listingId": id, "recipientEmail": carol.email });

    let first = test::call_service(
        &app,
        alice
            .authorize(TestRequest::post().uri("/api/users/recommend"))
            .set_json(&body)
            .to_request(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);
    let first: Value = test::read_body_json(first).await;
    assert_eq!(first["message"], "Property recommended successfully");

    let repeat = test::call_service(
        &app,
        alice
            .authorize(TestRequest::post().uri("/api/users/recommend"))
            .set_json(&body)
            .to_request(),
    )
    .await;
    assert_eq!(repeat.status(), StatusCode::CONFLICT);

    let from_bob = test::call_service(
        &app,
        bob.authorize(TestRequest::post().uri("/api/users/recommend"))
            .set_json(&body)
            .to_request(),
    )
    .await;
    assert_eq!(from_bob.status(), StatusCode::OK);

    let received: Vec<Value> = test::call_and_read_body_json(
        &app,
        carol
            .authorize(TestRequest::get().uri("/api/users/recommendations"))
            .to_request(),
    )
    .await;
    assert_eq!(received.len(), 2);
    let mut senders: Vec<_> = received
        .iter()
        .map(|entry| entry["from"]["id"].as_str().expect("sender id").to_owned())
        .collect();
    senders.sort();
    let mut expected = vec![alice.id.to_string(), bob.id.to_string()];
    expected.sort();
    assert_eq!(senders, expected);
    assert!(received.iter().all(|entry| entry["property"]["id"] == id.as_str()));
}

#[rstest]
#[actix_web::test]
async fn recommending_to_an_unknown_email_is_not_found() {
    let harness = Harness::new();
    let owner = harness.register("owner@example.com").await;
    let app = test::init_service(harness.app()).await;
    let id = create_listing(&app, &owner).await;

    let response = test::call_service(
        &app,
        owner
            .authorize(TestRequest::post().uri("/api/users/recommend"))
            .set_json(json!({ "listingId": id, "recipientEmail": "nobody@example.com" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
