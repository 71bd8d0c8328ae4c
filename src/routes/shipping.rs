use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::shipping::{RateQuote, RateQuoteRequest, ShippingMethodList, ShippingMethodsRequest},
    error::{AppError, AppResult},
    models::Destination,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/methods", post(shipping_methods))
        .route("/rates", post(rate_quote))
}

#[utoipa::path(
    post,
    path = "/api/shipping/methods",
    request_body = ShippingMethodsRequest,
    responses(
        (status = 200, description = "Delivery options with base prices", body = ApiResponse<ShippingMethodList>),
        (status = 400, description = "Bad request"),
    ),
    tag = "Shipping"
)]
pub async fn shipping_methods(
    State(state): State<AppState>,
    Json(payload): Json<ShippingMethodsRequest>,
) -> AppResult<Json<ApiResponse<ShippingMethodList>>> {
    if payload.subtotal.is_sign_negative() {
        return Err(AppError::BadRequest("subtotal must not be negative".into()));
    }
    let destination = Destination::new(&payload.country_code, &payload.city);
    let items = state
        .checkout
        .shipping_methods(&destination, payload.subtotal);
    Ok(Json(ApiResponse::success(
        "OK",
        ShippingMethodList { items },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    post,
    path = "/api/shipping/rates",
    request_body = RateQuoteRequest,
    responses(
        (status = 200, description = "Door-to-door quote; `supported` is false when the carrier cannot price the destination", body = ApiResponse<RateQuote>),
        (status = 400, description = "Invalid cart lines"),
    ),
    tag = "Shipping"
)]
pub async fn rate_quote(
    State(state): State<AppState>,
    Json(payload): Json<RateQuoteRequest>,
) -> AppResult<Json<ApiResponse<RateQuote>>> {
    let destination = Destination::new(&payload.country_code, &payload.city);
    let quote = state.checkout.quote(destination, &payload.lines).await?;
    Ok(Json(ApiResponse::success("OK", quote, Some(Meta::empty()))))
}
