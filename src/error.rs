use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    checkout::{CouponError, FieldError, SessionError, SubmitBlock, SubmitError},
    coupons::CouponRejection,
    i18n::Localized,
    locations::LocationError,
    response::ApiResponse,
    store::StoreError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Conflict {0}")]
    Conflict(String),

    #[error("Checkout blocked: {0:?}")]
    SubmitBlocked(SubmitBlock),

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Coupon rejected: {0}")]
    Coupon(#[from] CouponRejection),

    #[error("Location lookup failed")]
    Location(#[from] LocationError),

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("Store error")]
    Store(#[from] StoreError),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::MethodUnavailable(_) => AppError::BadRequest(err.to_string()),
            SessionError::Closed | SessionError::Busy => AppError::Conflict(err.to_string()),
        }
    }
}

impl From<CouponError> for AppError {
    fn from(err: CouponError) -> Self {
        match err {
            CouponError::Session(err) => err.into(),
            CouponError::Rejected(rejection) => rejection.into(),
        }
    }
}

impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Session(err) => err.into(),
            SubmitError::Blocked(block) => AppError::SubmitBlocked(block),
            SubmitError::Invalid(fields) => AppError::Validation(fields),
        }
    }
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    localized: Option<Localized>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<Vec<FieldError>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::SubmitBlocked(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Coupon(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Location(LocationError::UnknownCountry(_)) => StatusCode::NOT_FOUND,
            AppError::Location(_) => StatusCode::BAD_GATEWAY,
            AppError::DbError(_)
            | AppError::Store(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }

        let message = self.to_string();
        let (localized, fields) = match self {
            AppError::Coupon(rejection) => (Some(rejection.message()), None),
            AppError::SubmitBlocked(block) => (Some(block.message()), None),
            AppError::Validation(fields) => (None, Some(fields)),
            _ => (None, None),
        };

        let body = ApiResponse::failure(
            message.clone(),
            ErrorData {
                error: message,
                localized,
                fields,
            },
        );

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
