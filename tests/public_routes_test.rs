mod common;

use actix_web::test;
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;

use common::{send, TestApp};

fn decimal(value: &serde_json::Value) -> Decimal {
    match value {
        serde_json::Value::String(s) => Decimal::from_str(s).unwrap(),
        other => Decimal::from_str(&other.to_string()).unwrap(),
    }
}

#[actix_rt::test]
async fn test_health_check() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let (status, body) = send(&app, req).await;
    assert!(status.is_success());
    assert_eq!(body["status"], "ok");
}

#[actix_rt::test]
async fn test_search_filters_and_sorts() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/properties?sort=price_low&max_price=300")
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);

    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Mountain Lodge", "Seaside Resort", "Grand Palace Hotel"]);
    assert_eq!(decimal(&body[0]["min_price"]), Decimal::from(159));
    assert_eq!(body[0]["review_count"], 1);

    let req = test::TestRequest::get()
        .uri("/api/properties?location=miami&type=resort")
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["avg_rating"], 5.0);

    // searches are recorded
    assert_eq!(test_app.state.analytics.len().await, 2);
}

#[actix_rt::test]
async fn test_property_detail() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/api/properties/1").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["name"], "Grand Palace Hotel");
    assert_eq!(body["type"], "hotel");
    assert_eq!(body["avg_rating"], 4.5);

    let req = test::TestRequest::get().uri("/api/properties/404").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Property 404 not found");
}

#[actix_rt::test]
async fn test_quote_matches_worked_examples() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/quotes")
        .set_json(json!({
            "property_id": 1,
            "room_id": 1,
            "check_in": "2024-02-15",
            "check_out": "2024-02-18"
        }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["nights"], 3);
    assert_eq!(decimal(&body["room_total"]), Decimal::from(897));
    assert_eq!(decimal(&body["taxes"]), Decimal::from(108));
    assert_eq!(decimal(&body["total"]), Decimal::from(1030));

    let req = test::TestRequest::post()
        .uri("/api/quotes")
        .set_json(json!({
            "property_id": 2,
            "room_id": 3,
            "check_in": "2024-03-01",
            "check_out": "2024-03-05"
        }))
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(decimal(&body["taxes"]), Decimal::from(91));
    assert_eq!(decimal(&body["total"]), Decimal::from(872));
}

#[actix_rt::test]
async fn test_quote_rejects_bad_input() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/quotes")
        .set_json(json!({
            "property_id": 1,
            "room_id": 1,
            "check_in": "2024-02-18",
            "check_out": "2024-02-18"
        }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 400);
    assert_eq!(
        body["error"],
        "check-out 2024-02-18 must be after check-in 2024-02-18"
    );

    let req = test::TestRequest::post()
        .uri("/api/quotes")
        .set_json(json!({
            "property_id": 1,
            "room_id": 1,
            "check_in": "2024-02-15",
            "check_out": "2024-02-18",
            "guests": 3
        }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, 400);

    let req = test::TestRequest::post()
        .uri("/api/quotes")
        .set_json(json!({
            "property_id": 1,
            "room_id": 5,
            "check_in": "2024-02-15",
            "check_out": "2024-02-18"
        }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_recommendations() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/recommendations/trending?limit=2")
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["reason"]["type"], "trending");
    assert_eq!(body[0]["reason"]["text"], "Trending now");

    let req = test::TestRequest::get()
        .uri("/api/recommendations/nearby")
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
    assert_eq!(body[0]["reason"]["text"], "Popular choice");

    let req = test::TestRequest::get()
        .uri("/api/recommendations/everything")
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_anonymous_analytics_event() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/analytics/events")
        .set_json(json!({ "name": "page_view", "properties": { "page": "/search" } }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 202);
    assert_eq!(body["id"], 1);

    let req = test::TestRequest::post()
        .uri("/api/analytics/events")
        .set_json(json!({ "name": "  " }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, 400);
}

#[actix_rt::test]
async fn test_review_filters() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/properties/1/reviews")
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    let reviews = body.as_array().unwrap();
    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0]["user_name"], "Priya Patel");

    let req = test::TestRequest::get()
        .uri("/api/properties/1/reviews?sort=highest")
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body[0]["rating"], 5);

    let req = test::TestRequest::get()
        .uri("/api/properties/1/reviews?ratings=4&sort=oldest")
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["rating"], 4);

    let req = test::TestRequest::get()
        .uri("/api/properties/99/reviews")
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, 404);
}
