use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    audit::{self, AuditEvent},
    checkout::{CheckoutOrder, CheckoutView},
    dto::checkout::{
        ApplyCouponRequest, OpenCheckoutRequest, ReplaceCartRequest, SelectMethodRequest,
        SubmitOutcome, UpdateDetailsRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(open_session))
        .route("/sessions/{id}", get(get_session).delete(discard_session))
        .route("/sessions/{id}/details", put(update_details))
        .route("/sessions/{id}/cart", put(replace_cart))
        .route("/sessions/{id}/shipping-method", put(select_method))
        .route("/sessions/{id}/coupon", post(apply_coupon).delete(remove_coupon))
        .route("/sessions/{id}/submit", post(submit))
        .route("/sessions/{id}/resume", post(resume))
        .route("/last-order", get(last_order))
}

fn user_id(user: &Option<AuthUser>) -> Option<Uuid> {
    user.as_ref().map(|u| u.user_id)
}

fn view_response(message: &str, view: CheckoutView) -> Json<ApiResponse<CheckoutView>> {
    Json(ApiResponse::success(message, view, Some(Meta::empty())))
}

#[utoipa::path(
    post,
    path = "/api/checkout/sessions",
    request_body = OpenCheckoutRequest,
    responses(
        (status = 201, description = "Checkout session opened", body = ApiResponse<CheckoutView>),
        (status = 400, description = "Invalid cart lines"),
        (status = 401, description = "Invalid token"),
    ),
    tag = "Checkout"
)]
pub async fn open_session(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Json(payload): Json<OpenCheckoutRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CheckoutView>>)> {
    let view = state.checkout.open(user_id(&user), payload).await?;
    Ok((StatusCode::CREATED, view_response("Checkout opened", view)))
}

#[utoipa::path(
    get,
    path = "/api/checkout/sessions/{id}",
    params(("id" = Uuid, Path, description = "Checkout session id")),
    responses(
        (status = 200, description = "Current checkout state", body = ApiResponse<CheckoutView>),
        (status = 403, description = "Session belongs to another shopper"),
        (status = 404, description = "Not found"),
    ),
    tag = "Checkout"
)]
pub async fn get_session(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CheckoutView>>> {
    let view = state.checkout.view(id, user_id(&user)).await?;
    Ok(view_response("OK", view))
}

#[utoipa::path(
    delete,
    path = "/api/checkout/sessions/{id}",
    params(("id" = Uuid, Path, description = "Checkout session id")),
    responses(
        (status = 204, description = "Session discarded"),
        (status = 404, description = "Not found"),
    ),
    tag = "Checkout"
)]
pub async fn discard_session(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.checkout.discard(id, user_id(&user)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/checkout/sessions/{id}/details",
    params(("id" = Uuid, Path, description = "Checkout session id")),
    request_body = UpdateDetailsRequest,
    responses(
        (status = 200, description = "Details saved; a new rate lookup may be pending", body = ApiResponse<CheckoutView>),
        (status = 409, description = "Checkout already submitted"),
    ),
    tag = "Checkout"
)]
pub async fn update_details(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDetailsRequest>,
) -> AppResult<Json<ApiResponse<CheckoutView>>> {
    let view = state
        .checkout
        .update_details(id, user_id(&user), payload.details, payload.locale)
        .await?;
    Ok(view_response("Details updated", view))
}

#[utoipa::path(
    put,
    path = "/api/checkout/sessions/{id}/cart",
    params(("id" = Uuid, Path, description = "Checkout session id")),
    request_body = ReplaceCartRequest,
    responses(
        (status = 200, description = "Cart replaced", body = ApiResponse<CheckoutView>),
        (status = 400, description = "Invalid cart lines"),
    ),
    tag = "Checkout"
)]
pub async fn replace_cart(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReplaceCartRequest>,
) -> AppResult<Json<ApiResponse<CheckoutView>>> {
    let view = state
        .checkout
        .replace_cart(id, user_id(&user), payload.lines)
        .await?;
    Ok(view_response("Cart updated", view))
}

#[utoipa::path(
    put,
    path = "/api/checkout/sessions/{id}/shipping-method",
    params(("id" = Uuid, Path, description = "Checkout session id")),
    request_body = SelectMethodRequest,
    responses(
        (status = 200, description = "Shipping method selected", body = ApiResponse<CheckoutView>),
        (status = 400, description = "Method not offered for this destination"),
    ),
    tag = "Checkout"
)]
pub async fn select_method(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SelectMethodRequest>,
) -> AppResult<Json<ApiResponse<CheckoutView>>> {
    let view = state
        .checkout
        .select_method(id, user_id(&user), payload.method)
        .await?;
    Ok(view_response("Shipping method selected", view))
}

#[utoipa::path(
    post,
    path = "/api/checkout/sessions/{id}/coupon",
    params(("id" = Uuid, Path, description = "Checkout session id")),
    request_body = ApplyCouponRequest,
    responses(
        (status = 200, description = "Coupon applied", body = ApiResponse<CheckoutView>),
        (status = 422, description = "Coupon rejected"),
    ),
    tag = "Checkout"
)]
pub async fn apply_coupon(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApplyCouponRequest>,
) -> AppResult<Json<ApiResponse<CheckoutView>>> {
    let view = state
        .checkout
        .apply_coupon(id, user_id(&user), &payload.code)
        .await?;
    Ok(view_response("Coupon applied", view))
}

#[utoipa::path(
    delete,
    path = "/api/checkout/sessions/{id}/coupon",
    params(("id" = Uuid, Path, description = "Checkout session id")),
    responses(
        (status = 200, description = "Coupon removed", body = ApiResponse<CheckoutView>),
    ),
    tag = "Checkout"
)]
pub async fn remove_coupon(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CheckoutView>>> {
    let view = state.checkout.remove_coupon(id, user_id(&user)).await?;
    Ok(view_response("Coupon removed", view))
}

async fn record_submission(state: &AppState, session_id: Uuid, outcome: &SubmitOutcome) {
    if let SubmitOutcome::Submitted { order } = outcome {
        let event = AuditEvent::new("checkout_submit", order.user_id)
            .on("checkout_snapshots")
            .with(serde_json::json!({
                "session_id": session_id,
                "order_id": order.id,
                "grand_total": order.totals.grand_total,
                "coupon": order.coupon_code,
            }));
        audit::record(&state.pool, event).await;
    }
}

#[utoipa::path(
    post,
    path = "/api/checkout/sessions/{id}/submit",
    params(("id" = Uuid, Path, description = "Checkout session id")),
    responses(
        (status = 200, description = "Order handed off, or login required first", body = ApiResponse<SubmitOutcome>),
        (status = 400, description = "Form has invalid fields"),
        (status = 409, description = "Submit is blocked while shipping is unresolved"),
        (status = 422, description = "Coupon no longer valid"),
    ),
    tag = "Checkout"
)]
pub async fn submit(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<SubmitOutcome>>> {
    let outcome = state.checkout.submit(id, user_id(&user)).await?;
    record_submission(&state, id, &outcome).await;
    let message = match outcome {
        SubmitOutcome::LoginRequired { .. } => "Login required",
        SubmitOutcome::Submitted { .. } => "Checkout submitted",
    };
    Ok(Json(ApiResponse::success(message, outcome, Some(Meta::empty()))))
}

#[utoipa::path(
    post,
    path = "/api/checkout/sessions/{id}/resume",
    params(("id" = Uuid, Path, description = "Checkout session id")),
    responses(
        (status = 200, description = "Submission resumed after login", body = ApiResponse<SubmitOutcome>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Checkout"
)]
pub async fn resume(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<SubmitOutcome>>> {
    let outcome = state.checkout.resume(id, user.user_id).await?;
    record_submission(&state, id, &outcome).await;
    Ok(Json(ApiResponse::success(
        "Checkout submitted",
        outcome,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/checkout/last-order",
    responses(
        (status = 200, description = "The shopper's most recent submission", body = ApiResponse<CheckoutOrder>),
        (status = 404, description = "Nothing submitted yet"),
    ),
    security(("bearer_auth" = [])),
    tag = "Checkout"
)]
pub async fn last_order(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CheckoutOrder>>> {
    let order = state.checkout.last_order(user.user_id).await?;
    Ok(Json(ApiResponse::success("OK", order, Some(Meta::empty()))))
}
