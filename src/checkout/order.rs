use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    checkout::details::DeliveryDetails,
    i18n::{Locale, Localized},
    models::CartLine,
    money::round_omr,
    shipping::ShippingMethodId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Totals {
    #[schema(value_type = String)]
    pub subtotal: Decimal,
    #[schema(value_type = String)]
    pub shipping: Decimal,
    #[schema(value_type = String)]
    pub discount: Decimal,
    #[schema(value_type = String)]
    pub grand_total: Decimal,
}

impl Totals {
    /// The discount is capped at what the order costs, so the grand total
    /// never drops below zero and the reported figures always add up.
    pub fn compute(subtotal: Decimal, shipping: Decimal, discount: Decimal) -> Self {
        let subtotal = round_omr(subtotal);
        let shipping = round_omr(shipping);
        let gross = subtotal.saturating_add(shipping);
        let discount = round_omr(discount).min(gross).max(Decimal::ZERO);
        Self {
            subtotal,
            shipping,
            discount,
            grand_total: round_omr((gross - discount).max(Decimal::ZERO)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChosenShipping {
    pub method: ShippingMethodId,
    pub label: Localized,
    #[schema(value_type = String)]
    pub cost: Decimal,
}

/// What the shopper agreed to pay for, frozen at submission and handed to
/// the payment step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CheckoutOrder {
    pub id: Uuid,
    pub user_id: Uuid,
    pub locale: Locale,
    pub lines: Vec<CartLine>,
    pub shipping: ChosenShipping,
    pub totals: Totals,
    pub coupon_code: Option<String>,
    pub details: DeliveryDetails,
    pub created_at: DateTime<Utc>,
}
