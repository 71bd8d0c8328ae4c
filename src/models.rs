use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    money::round_omr,
    shipping::weight::to_kg,
};

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub role: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    G,
    Kg,
    Lb,
    Oz,
}

/// One line of the shopper's cart as handed over by the cart store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    #[schema(value_type = String, example = "6.500")]
    pub unit_price: Decimal,
    pub quantity: u32,
    #[schema(value_type = Option<String>)]
    pub weight: Option<Decimal>,
    pub weight_unit: Option<WeightUnit>,
}

pub const MAX_CART_LINES: usize = 100;
pub const MAX_LINE_QUANTITY: u32 = 1_000;

/// Highest unit price accepted from a client, in OMR.
pub fn max_unit_price() -> Decimal {
    Decimal::from(10_000)
}

impl CartLine {
    /// Saturates instead of overflowing; [`validate_cart`] keeps real carts
    /// far below the limit.
    pub fn line_total(&self) -> Decimal {
        self.unit_price.saturating_mul(Decimal::from(self.quantity))
    }

    fn check(&self) -> Result<(), String> {
        if self.product_id.trim().is_empty() {
            return Err("product_id must not be empty".into());
        }
        if self.name.trim().is_empty() {
            return Err(format!("name of {} must not be empty", self.product_id));
        }
        if self.quantity == 0 {
            return Err(format!(
                "quantity of {} must be greater than 0",
                self.product_id
            ));
        }
        if self.quantity > MAX_LINE_QUANTITY {
            return Err(format!(
                "quantity of {} must not exceed {MAX_LINE_QUANTITY}",
                self.product_id
            ));
        }
        if self.unit_price.is_sign_negative() {
            return Err(format!("unit_price of {} must not be negative", self.product_id));
        }
        if self.unit_price > max_unit_price() {
            return Err(format!(
                "unit_price of {} must not exceed {}",
                self.product_id,
                max_unit_price()
            ));
        }
        if let Some(weight) = self.weight {
            if weight.is_sign_negative() {
                return Err(format!("weight of {} must not be negative", self.product_id));
            }
            let kg = to_kg(weight, self.weight_unit.unwrap_or(WeightUnit::G));
            if kg.is_none_or(|kg| kg > max_item_kg()) {
                return Err(format!(
                    "weight of {} must not exceed {} kg",
                    self.product_id,
                    max_item_kg()
                ));
            }
        }
        Ok(())
    }
}

/// Heaviest single item a client may declare, in kg.
pub fn max_item_kg() -> Decimal {
    Decimal::from(1_000)
}

/// Reject cart lines a storefront could never produce. An empty cart is
/// allowed; it only blocks submission.
pub fn validate_cart(lines: &[CartLine]) -> AppResult<()> {
    if lines.len() > MAX_CART_LINES {
        return Err(AppError::BadRequest(format!(
            "cart must not have more than {MAX_CART_LINES} lines"
        )));
    }
    let mut subtotal = Decimal::ZERO;
    for line in lines {
        line.check().map_err(AppError::BadRequest)?;
        subtotal = line
            .unit_price
            .checked_mul(Decimal::from(line.quantity))
            .and_then(|total| subtotal.checked_add(total))
            .ok_or_else(|| AppError::BadRequest("cart total is too large".into()))?;
    }
    Ok(())
}

pub fn cart_subtotal(lines: &[CartLine]) -> Decimal {
    let total = lines
        .iter()
        .fold(Decimal::ZERO, |acc, line| acc.saturating_add(line.line_total()));
    round_omr(total)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Address {
    pub country_code: String,
    pub city: String,
    #[serde(default)]
    pub street: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Contact {
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

/// Where a parcel goes, normalised for comparisons and carrier requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Destination {
    pub country_code: String,
    pub city: String,
}

impl Destination {
    pub fn new(country_code: &str, city: &str) -> Self {
        Self {
            country_code: country_code.trim().to_ascii_uppercase(),
            city: city.trim().to_string(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.country_code.len() == 2 && !self.city.is_empty()
    }
}

impl From<&Address> for Destination {
    fn from(address: &Address) -> Self {
        Destination::new(&address.country_code, &address.city)
    }
}
