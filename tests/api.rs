mod common;

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    routing::get,
};
use coffee_checkout_api::{
    routes::{create_api_router, health},
    store::MemoryStore,
};
use common::{ScriptedRates, app_state, service};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    let checkout = service(Arc::new(ScriptedRates::new()), Arc::new(MemoryStore::new()));
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", create_api_router())
        .with_state(app_state(checkout))
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn open_body(city: &str) -> Value {
    json!({
        "locale": "ar",
        "lines": [
            { "product_id": "beans-1kg", "name": "House Blend 1kg", "unit_price": "9.000", "quantity": 1 }
        ],
        "details": {
            "mode": "standard",
            "customer": { "full_name": "Laila Al Amri", "email": "laila@example.om", "phone": "92345678" },
            "address": { "country_code": "OM", "city": city, "street": "Way 12" }
        }
    })
}

#[tokio::test]
async fn free_local_delivery_above_threshold() {
    let app = app();
    let (status, body) = call(
        &app,
        "POST",
        "/api/shipping/methods",
        Some(json!({ "country_code": "om", "city": "Muscat", "subtotal": "25.000" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[1]["id"], "local_courier");
    assert_eq!(items[1]["badge"]["en"], "Free delivery");
}

#[tokio::test]
async fn remote_city_pays_the_remote_fee() {
    let app = app();
    let (_, body) = call(
        &app,
        "POST",
        "/api/shipping/methods",
        Some(json!({ "country_code": "OM", "city": "Khasab", "subtotal": "10.000" })),
    )
    .await;
    assert_eq!(body["data"]["items"][1]["price"], "3.000");
}

#[tokio::test]
async fn guest_submit_asks_for_login() {
    let app = app();
    let (status, body) = call(&app, "POST", "/api/checkout/sessions", Some(open_body("Nizwa"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["locale"], "ar");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = call(&app, "POST", &format!("/api/checkout/sessions/{id}/submit"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["outcome"], "login_required");
    assert_eq!(
        body["data"]["resume_path"],
        format!("/api/checkout/sessions/{id}/resume")
    );

    let (status, _) = call(&app, "POST", &format!("/api/checkout/sessions/{id}/resume"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn rejected_coupon_is_explained_in_both_languages() {
    let app = app();
    let (_, body) = call(&app, "POST", "/api/checkout/sessions", Some(open_body("Sur"))).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/checkout/sessions/{id}/coupon"),
        Some(json!({ "code": "welcome5" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["data"]["localized"]["en"],
        "Order must be at least 15.000 OMR to use this coupon"
    );
    assert!(body["data"]["localized"]["ar"].as_str().is_some());
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let app = app();
    let (status, _) = call(
        &app,
        "GET",
        "/api/checkout/sessions/7a0f7a4e-35c4-4a4f-9a53-2f1f6f0a9e11",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, "GET", "/api/checkout/last-order", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn cities_come_from_the_directory() {
    let app = app();
    let (status, body) = call(&app, "GET", "/api/locations/countries/om/cities", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["country_code"], "OM");
    assert_eq!(body["data"]["items"][2], "Khasab");

    let (status, _) = call(&app, "GET", "/api/locations/countries/ZZ/cities", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_cart_lines_are_a_bad_request() {
    let app = app();
    let mut body = open_body("Muscat");
    body["lines"][0]["quantity"] = json!(0);
    let (status, body) = call(&app, "POST", "/api/checkout/sessions", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["data"]["error"]
            .as_str()
            .unwrap()
            .contains("quantity of beans-1kg must be greater than 0")
    );

    let (status, _) = call(
        &app,
        "POST",
        "/api/shipping/rates",
        Some(json!({
            "country_code": "AE",
            "city": "Dubai",
            "lines": [{
                "product_id": "sack",
                "name": "Green beans sack",
                "unit_price": "90.000",
                "quantity": 2,
                "weight": "79228162514264337593543950335",
                "weight_unit": "kg"
            }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
