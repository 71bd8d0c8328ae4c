use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod checkout;
pub mod doc;
pub mod health;
pub mod locations;
pub mod shipping;

/// Everything under `/api`. `main` attaches `AppState` with `with_state`.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/locations", locations::router())
        .nest("/shipping", shipping::router())
        .nest("/checkout", checkout::router())
}
