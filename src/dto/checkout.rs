use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    checkout::{CheckoutOrder, DeliveryDetails},
    i18n::Locale,
    models::CartLine,
    shipping::ShippingMethodId,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct OpenCheckoutRequest {
    pub lines: Vec<CartLine>,
    pub details: DeliveryDetails,
    pub locale: Option<Locale>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateDetailsRequest {
    pub details: DeliveryDetails,
    pub locale: Option<Locale>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReplaceCartRequest {
    pub lines: Vec<CartLine>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectMethodRequest {
    pub method: ShippingMethodId,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApplyCouponRequest {
    pub code: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// The shopper must log in; the session keeps the form and can be resumed.
    LoginRequired { session_id: Uuid, resume_path: String },
    Submitted { order: CheckoutOrder },
}
