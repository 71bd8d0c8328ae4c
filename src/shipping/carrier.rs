//! Door-to-door carrier pricing.
//!
//! The carrier is reached through the [`RateProvider`] seam so the checkout
//! flow can run against a fake in tests. [`CarrierClient`] is the HTTP
//! implementation used in production.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::{config::CarrierConfig, models::Destination, money::CURRENCY};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateAddress {
    pub country_code: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line1: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Weight {
    pub value: u32,
    pub unit: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dimensions {
    pub length: u32,
    pub width: u32,
    pub height: u32,
    pub unit: &'static str,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            length: 30,
            width: 20,
            height: 15,
            unit: "CM",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipmentDetails {
    pub weight: Weight,
    pub dimensions: Dimensions,
    pub number_of_pieces: u32,
    pub product_group: &'static str,
    pub product_type: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateRequest {
    pub origin: RateAddress,
    pub destination: RateAddress,
    pub shipment: ShipmentDetails,
    pub preferred_currency_code: &'static str,
}

impl RateRequest {
    /// Build a request from the roastery in Muscat to `destination`.
    /// Domestic parcels use the on-net product, everything else priority
    /// express.
    pub fn new(destination: &Destination, chargeable_kg: u32, home_country: &str) -> Self {
        let domestic = destination.country_code.eq_ignore_ascii_case(home_country);
        let (product_group, product_type) = if domestic {
            ("DOM", "ONP")
        } else {
            ("EXP", "PPX")
        };
        Self {
            origin: RateAddress {
                country_code: home_country.to_ascii_uppercase(),
                city: "Muscat".into(),
                line1: Some("Al Khuwair, Way 3021".into()),
            },
            destination: RateAddress {
                country_code: destination.country_code.clone(),
                city: destination.city.clone(),
                line1: None,
            },
            shipment: ShipmentDetails {
                weight: Weight {
                    value: chargeable_kg,
                    unit: "KG",
                },
                dimensions: Dimensions::default(),
                number_of_pieces: 1,
                product_group,
                product_type,
            },
            preferred_currency_code: CURRENCY,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RateResponse {
    #[serde(default)]
    pub has_errors: bool,
    #[serde(default)]
    pub notifications: Vec<CarrierNotification>,
    pub total_amount: Option<Money>,
}

#[derive(Debug, Deserialize)]
pub struct CarrierNotification {
    pub code: Option<String>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct Money {
    pub value: Decimal,
    pub currency_code: Option<String>,
}

/// Why the carrier could not price a parcel. Only ever logged; shoppers see
/// [`RateUnsupported`].
#[derive(Debug, Error)]
pub enum RateError {
    #[error("carrier request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("carrier responded with status {0}")]
    Status(reqwest::StatusCode),

    #[error("carrier rejected request: {}", .0.join("; "))]
    Rejected(Vec<String>),

    #[error("carrier response carried no amount")]
    MissingAmount,

    #[error("carrier quoted a non-positive amount {0}")]
    NonPositive(Decimal),

    #[error("carrier quoted in {0}")]
    Currency(String),
}

impl RateResponse {
    pub fn into_amount(self) -> Result<Decimal, RateError> {
        if self.has_errors {
            return Err(RateError::Rejected(
                self.notifications
                    .into_iter()
                    .map(|n| match n.code {
                        Some(code) => format!("{code}: {}", n.message),
                        None => n.message,
                    })
                    .collect(),
            ));
        }
        let amount = self.total_amount.ok_or(RateError::MissingAmount)?;
        if let Some(currency) = amount.currency_code
            && !currency.eq_ignore_ascii_case(CURRENCY)
        {
            return Err(RateError::Currency(currency));
        }
        if amount.value <= Decimal::ZERO {
            return Err(RateError::NonPositive(amount.value));
        }
        Ok(amount.value)
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn quote(&self, request: &RateRequest) -> Result<Decimal, RateError>;
}

/// HTTP client for the carrier's rate endpoint.
#[derive(Clone)]
pub struct CarrierClient {
    inner: Arc<CarrierClientInner>,
}

struct CarrierClientInner {
    client: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
}

impl CarrierClient {
    pub fn new(config: &CarrierConfig) -> Result<Self, RateError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            inner: Arc::new(CarrierClientInner {
                client,
                endpoint: format!("{}/rates", config.base_url.trim_end_matches('/')),
                api_key: config.api_key.clone(),
            }),
        })
    }
}

#[async_trait]
impl RateProvider for CarrierClient {
    #[instrument(skip(self, request), fields(
        destination = %request.destination.country_code,
        city = %request.destination.city,
        kg = request.shipment.weight.value,
    ))]
    async fn quote(&self, request: &RateRequest) -> Result<Decimal, RateError> {
        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header("X-Api-Key", self.inner.api_key.expose_secret())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RateError::Status(status));
        }

        let body: RateResponse = response.json().await?;
        let amount = body.into_amount()?;
        debug!(%amount, "carrier quote received");
        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> RateResponse {
        serde_json::from_str(json).expect("valid response")
    }

    #[test]
    fn product_codes_follow_destination() {
        let domestic = RateRequest::new(&Destination::new("OM", "Sur"), 2, "OM");
        assert_eq!(domestic.shipment.product_group, "DOM");
        assert_eq!(domestic.shipment.product_type, "ONP");
        assert_eq!(domestic.shipment.weight.value, 2);

        let abroad = RateRequest::new(&Destination::new("AE", "Dubai"), 1, "OM");
        assert_eq!(abroad.shipment.product_group, "EXP");
        assert_eq!(abroad.shipment.product_type, "PPX");
        assert_eq!(abroad.origin.city, "Muscat");
        assert_eq!(abroad.shipment.dimensions, Dimensions::default());
    }

    #[test]
    fn positive_amount_is_accepted() {
        let body = parse(r#"{"has_errors":false,"total_amount":{"value":4.75,"currency_code":"OMR"}}"#);
        assert_eq!(body.into_amount().unwrap(), Decimal::new(475, 2));
    }

    #[test]
    fn errors_and_empty_amounts_are_rejected() {
        let body = parse(
            r#"{"has_errors":true,"notifications":[{"code":"ERR01","message":"no service"}]}"#,
        );
        assert!(matches!(body.into_amount(), Err(RateError::Rejected(msgs)) if msgs == vec!["ERR01: no service"]));

        assert!(matches!(parse("{}").into_amount(), Err(RateError::MissingAmount)));

        let zero = parse(r#"{"total_amount":{"value":0}}"#);
        assert!(matches!(zero.into_amount(), Err(RateError::NonPositive(_))));
    }
}
