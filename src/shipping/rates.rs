//! Keyed carrier quotes.
//!
//! Every rate lookup is identified by a [`RateKey`]: the inputs it was
//! computed from plus a sequence number that only ever grows. A result is
//! applied only while its key is still the current one, so a slow response for
//! a destination the shopper already left is dropped on arrival.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::{
    i18n::Localized,
    models::Destination,
    money::round_omr,
    shipping::{
        carrier::{RateProvider, RateRequest},
        catalog::ShippingRules,
    },
};

/// The single failure shoppers see for door-to-door pricing. Transport
/// errors, carrier rejections and zero quotes all end up here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Shipping is not supported for this destination")]
pub struct RateUnsupported;

impl RateUnsupported {
    pub fn message(&self) -> Localized {
        Localized::new(
            self.to_string(),
            "الشحن غير متاح لهذه الوجهة",
        )
    }
}

/// Inputs a quote depends on. Gift mode is part of it so that flipping the
/// toggle always forces a fresh quote.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub struct RateFingerprint {
    pub gift: bool,
    pub destination: Destination,
    pub chargeable_kg: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RateKey {
    pub seq: u64,
    pub fingerprint: RateFingerprint,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RateState {
    #[default]
    Idle,
    Pending(RateKey),
    Ready { key: RateKey, price: Decimal },
    Unsupported { key: RateKey },
}

impl RateState {
    pub fn key(&self) -> Option<&RateKey> {
        match self {
            RateState::Idle => None,
            RateState::Pending(key)
            | RateState::Ready { key, .. }
            | RateState::Unsupported { key } => Some(key),
        }
    }

    pub fn price(&self) -> Option<Decimal> {
        match self {
            RateState::Ready { price, .. } => Some(*price),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, RateState::Pending(_))
    }
}

/// Price a door-to-door delivery of `chargeable_kg` to `destination`.
pub async fn quote_weight(
    provider: &dyn RateProvider,
    rules: &ShippingRules,
    destination: &Destination,
    chargeable_kg: u32,
) -> Result<Decimal, RateUnsupported> {
    if !destination.is_complete() {
        return Err(RateUnsupported);
    }
    let request = RateRequest::new(destination, chargeable_kg, &rules.home_country);
    match provider.quote(&request).await {
        Ok(price) => Ok(round_omr(price)),
        Err(err) => {
            // Transient and permanent failures look the same to the shopper.
            tracing::warn!(
                error = %err,
                country = %destination.country_code,
                city = %destination.city,
                kg = chargeable_kg,
                "carrier rate unavailable"
            );
            Err(RateUnsupported)
        }
    }
}
