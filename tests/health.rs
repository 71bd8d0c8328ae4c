mod common;

use std::sync::Arc;

use axum::extract::State;
use coffee_checkout_api::{routes::health::health_check, store::MemoryStore};
use common::{ScriptedRates, app_state, service};

#[tokio::test]
async fn health_check_returns_ok() {
    let checkout = service(Arc::new(ScriptedRates::new()), Arc::new(MemoryStore::new()));
    let response = health_check(State(app_state(checkout))).await;
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.expect("health data");
    let json = serde_json::to_value(&data).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["open_checkouts"], 0);
}
