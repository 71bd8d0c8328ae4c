use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    i18n::Localized,
    models::{CartLine, Destination},
    shipping::ShippingMethod,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ShippingMethodsRequest {
    pub country_code: String,
    pub city: String,
    #[schema(value_type = String, example = "25.000")]
    pub subtotal: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShippingMethodList {
    pub items: Vec<ShippingMethod>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RateQuoteRequest {
    pub country_code: String,
    pub city: String,
    pub lines: Vec<CartLine>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RateQuote {
    pub destination: Destination,
    pub chargeable_kg: u32,
    pub supported: bool,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    pub error: Option<Localized>,
}
