/// Booking, review and search tests over the HTTP surface

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::TestContext;
use pawsit_shared::models::{offering::ServiceType, sitter::SitterStatus, user::Role};
use serde_json::{json, Value};

const OWNER: i64 = 1;
const SITTER: i64 = 2;
const ADMIN: i64 = 3;
const OTHER_OWNER: i64 = 4;
const PET: i64 = 10;
const SERVICE: i64 = 20;

/// Owner with a dog, an approved sitter with a walking service, an admin
fn seeded() -> TestContext {
    let ctx = TestContext::new();
    ctx.store.insert_user(OWNER, "Ann Owner", "ann@example.com", Role::Owner);
    ctx.store
        .insert_sitter(SITTER, "Sam Sitter", "Springfield", SitterStatus::Approved);
    ctx.store.insert_user(ADMIN, "Ada Admin", "admin@example.com", Role::Admin);
    ctx.store
        .insert_user(OTHER_OWNER, "Bob Owner", "bob@example.com", Role::Owner);
    ctx.store.insert_pet(PET, OWNER, "Rex", "dog");
    ctx.store
        .insert_offering(SERVICE, SITTER, ServiceType::Walking, 15.0);
    ctx
}

/// Booking body starting `offset_hours` from now and lasting `hours`
fn booking_body(offset_hours: i64, hours: i64) -> Value {
    let start = Utc::now() + Duration::hours(offset_hours);
    let end = start + Duration::hours(hours);
    json!({
        "sitter_id": SITTER,
        "pet_id": PET,
        "service_id": SERVICE,
        "start_time": start.to_rfc3339(),
        "end_time": end.to_rfc3339(),
    })
}

#[tokio::test]
async fn test_booking_lifecycle_and_review() {
    let ctx = seeded();
    let owner = ctx.token(OWNER, Role::Owner);
    let sitter = ctx.token(SITTER, Role::Sitter);

    let (status, body) = ctx
        .post("/api/bookings", Some(&owner), booking_body(24, 2))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let booking_id = body["booking_id"].as_i64().unwrap();

    let (status, body) = ctx
        .get(&format!("/api/bookings/{}", booking_id), Some(&owner))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");

    // Owners cannot confirm their own booking
    let confirm = format!("/api/bookings/{}/confirm", booking_id);
    let (status, _) = ctx.post(&confirm, Some(&owner), json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = ctx.post(&confirm, Some(&sitter), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "booking confirmed");

    let complete = format!("/api/bookings/{}/complete", booking_id);
    let (status, _) = ctx.post(&complete, Some(&sitter), json!({})).await;
    assert_eq!(status, StatusCode::OK);

    // Terminal states refuse further transitions
    let (status, _) = ctx.post(&confirm, Some(&sitter), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let cancel = format!("/api/bookings/{}/cancel", booking_id);
    let (status, _) = ctx.post(&cancel, Some(&owner), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = ctx
        .post(
            "/api/reviews",
            Some(&owner),
            json!({ "booking_id": booking_id, "rating": 4, "comment": "Great walk" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let review_id = body["review_id"].as_i64().unwrap();

    let (status, body) = ctx
        .get(&format!("/api/bookings/{}/review", booking_id), Some(&sitter))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], review_id);
    assert_eq!(body["sitter_id"], SITTER);

    let (status, body) = ctx
        .get(&format!("/api/sitters/{}/rating", SITTER), Some(&owner))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["average_rating"], 4.0);
    assert_eq!(body["review_count"], 1);

    // Out-of-range edits are refused and leave the stored rating alone
    let review = format!("/api/reviews/{}", review_id);
    for rating in [0, 6] {
        let (status, _) = ctx
            .put(&review, &owner, json!({ "rating": rating, "comment": "Changed" }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
    let (status, body) = ctx.get(&review, Some(&owner)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rating"], 4);
    assert_eq!(body["comment"], "Great walk");
}

#[tokio::test]
async fn test_booking_window_rules() {
    let ctx = seeded();
    let owner = ctx.token(OWNER, Role::Owner);

    // End before start
    let mut reversed = booking_body(24, 2);
    let start = reversed["start_time"].clone();
    reversed["start_time"] = reversed["end_time"].clone();
    reversed["end_time"] = start;
    let (status, _) = ctx.post("/api/bookings", Some(&owner), reversed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // In the past
    let (status, _) = ctx
        .post("/api/bookings", Some(&owner), booking_body(-48, 2))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Longer than a day
    let (status, body) = ctx
        .post("/api/bookings", Some(&owner), booking_body(24, 25))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("24 hours"));

    // Not RFC 3339
    let mut garbled = booking_body(24, 2);
    garbled["start_time"] = json!("tomorrow at noon");
    let (status, _) = ctx.post("/api/bookings", Some(&owner), garbled).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_overlapping_booking_rejected_until_cancelled() {
    let ctx = seeded();
    let owner = ctx.token(OWNER, Role::Owner);
    let sitter = ctx.token(SITTER, Role::Sitter);

    let (status, body) = ctx
        .post("/api/bookings", Some(&owner), booking_body(24, 4))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let first = body["booking_id"].as_i64().unwrap();

    let (status, _) = ctx
        .post("/api/bookings", Some(&owner), booking_body(26, 4))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The sitter may cancel too
    let (status, body) = ctx
        .post(&format!("/api/bookings/{}/cancel", first), Some(&sitter), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "booking cancelled");

    let (status, _) = ctx
        .post("/api/bookings", Some(&owner), booking_body(26, 4))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_booking_ownership_rules() {
    let ctx = seeded();
    let owner = ctx.token(OWNER, Role::Owner);
    let other = ctx.token(OTHER_OWNER, Role::Owner);
    let sitter = ctx.token(SITTER, Role::Sitter);
    let admin = ctx.token(ADMIN, Role::Admin);

    // Someone else's pet
    let (status, _) = ctx
        .post("/api/bookings", Some(&other), booking_body(24, 2))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Booking on behalf of another owner
    let mut on_behalf = booking_body(24, 2);
    on_behalf["owner_id"] = json!(OWNER);
    let (status, _) = ctx.post("/api/bookings", Some(&other), on_behalf.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Sitters do not book
    let (status, _) = ctx
        .post("/api/bookings", Some(&sitter), booking_body(24, 2))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = ctx.post("/api/bookings", Some(&admin), on_behalf).await;
    assert_eq!(status, StatusCode::CREATED);
    let booking_id = body["booking_id"].as_i64().unwrap();

    let (status, _) = ctx
        .get(&format!("/api/bookings/{}", booking_id), Some(&other))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = ctx
        .get(&format!("/api/owners/{}/bookings", OWNER), Some(&owner))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = ctx
        .get(&format!("/api/owners/{}/bookings", OWNER), Some(&other))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Only the booking's owner reviews it
    let (status, _) = ctx
        .post(
            "/api/reviews",
            Some(&other),
            json!({ "booking_id": booking_id, "rating": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = ctx
        .post(
            "/api/reviews",
            Some(&owner),
            json!({ "booking_id": booking_id, "rating": 6 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "rating");
}

#[tokio::test]
async fn test_unknown_booking_and_bad_id() {
    let ctx = seeded();
    let sitter = ctx.token(SITTER, Role::Sitter);

    let (status, _) = ctx
        .post("/api/bookings/999/confirm", Some(&sitter), json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx.get("/api/bookings/0", Some(&sitter)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = ctx.get("/api/bookings/abc", Some(&sitter)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = ctx.get("/api/pets/abc", Some(&sitter)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = ctx.get("/api/no-such-route", Some(&sitter)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "route not found");
}

#[tokio::test]
async fn test_service_search_lists_approved_sitters_only() {
    let ctx = seeded();
    ctx.store
        .insert_sitter(5, "Pat Pending", "Springfield", SitterStatus::Pending);
    ctx.store
        .insert_offering(21, 5, ServiceType::Walking, 9.0);
    ctx.store
        .insert_sitter(6, "Bea Boarder", "Shelbyville", SitterStatus::Approved);
    ctx.store
        .insert_offering(22, 6, ServiceType::Boarding, 30.0);
    let owner = ctx.token(OWNER, Role::Owner);

    let (status, body) = ctx
        .get("/api/services/search?location=spring", Some(&owner))
        .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![SERVICE]);
    assert_eq!(body[0]["sitter_name"], "Sam Sitter");

    let (status, body) = ctx
        .get("/api/services/search?type=boarding", Some(&owner))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["type"], "boarding");

    let (status, body) = ctx.get("/api/services/search", Some(&owner)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    // An empty search form submits blank fields
    let (status, body) = ctx
        .get("/api/services/search?type=&location=", Some(&owner))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = ctx
        .get("/api/services/search?type=grooming", Some(&owner))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("grooming"));
}

#[tokio::test]
async fn test_service_management() {
    let ctx = seeded();
    let sitter = ctx.token(SITTER, Role::Sitter);
    let owner = ctx.token(OWNER, Role::Owner);

    let (status, body) = ctx
        .post(
            "/api/services",
            Some(&sitter),
            json!({
                "type": "home-care",
                "price_per_hour": 22.5,
                "description": "Feeding and play",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let service_id = body["service_id"].as_i64().unwrap();

    let (status, _) = ctx
        .post(
            "/api/services",
            Some(&owner),
            json!({ "type": "walking", "price_per_hour": 10 }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let uri = format!("/api/services/{}", service_id);
    let (status, _) = ctx
        .put(&uri, &owner, json!({ "type": "walking", "price_per_hour": 1 }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx
        .put(&uri, &sitter, json!({ "type": "home-care", "price_per_hour": 25 }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = ctx
        .get(&format!("/api/sitters/{}/services", SITTER), Some(&owner))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, _) = ctx.delete(&uri, &sitter).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = ctx.get(&uri, Some(&owner)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pet_management() {
    let ctx = seeded();
    let owner = ctx.token(OWNER, Role::Owner);
    let other = ctx.token(OTHER_OWNER, Role::Owner);

    let uri = format!("/api/pets/{}", PET);
    let (status, _) = ctx
        .put(&uri, &other, json!({ "name": "Stolen", "species": "dog", "age": 2 }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx
        .put(&uri, &owner, json!({ "name": "Rex", "species": "dragon", "age": 2 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = ctx
        .put(&uri, &owner, json!({ "name": "Rex", "species": "dog", "age": 3 }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = ctx
        .get(&format!("/api/owners/{}/pets", OWNER), Some(&owner))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["age"], 3);

    let (status, _) = ctx.delete(&uri, &owner).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = ctx.get(&uri, Some(&owner)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
