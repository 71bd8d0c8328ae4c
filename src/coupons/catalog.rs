use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{i18n::Localized, money::omr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    Percentage,
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coupon {
    pub code: String,
    pub kind: DiscountKind,
    #[schema(value_type = String)]
    pub value: Decimal,
    #[schema(value_type = Option<String>)]
    pub min_order: Option<Decimal>,
    pub expires_at: Option<DateTime<Utc>>,
    pub description: Localized,
}

/// Read-only table of the codes the roastery hands out.
#[derive(Debug, Clone)]
pub struct CouponCatalog {
    coupons: Vec<Coupon>,
}

impl CouponCatalog {
    pub fn new(coupons: Vec<Coupon>) -> Self {
        let coupons = coupons
            .into_iter()
            .map(|mut c| {
                c.code = c.code.to_ascii_uppercase();
                c
            })
            .collect();
        Self { coupons }
    }

    pub fn find(&self, code: &str) -> Option<&Coupon> {
        self.coupons
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coupon> {
        self.coupons.iter()
    }
}

impl Default for CouponCatalog {
    fn default() -> Self {
        let roast_expiry = Utc
            .with_ymd_and_hms(2025, 12, 31, 23, 59, 59)
            .single();
        Self::new(vec![
            Coupon {
                code: "THANKS10".into(),
                kind: DiscountKind::Percentage,
                value: Decimal::from(10),
                min_order: None,
                expires_at: None,
                description: Localized::new("10% off as a thank-you", "خصم 10% شكراً لك"),
            },
            Coupon {
                code: "WELCOME5".into(),
                kind: DiscountKind::Fixed,
                value: omr(5_000),
                min_order: Some(omr(15_000)),
                expires_at: None,
                description: Localized::new(
                    "5 OMR off orders over 15 OMR",
                    "خصم 5 ر.ع على الطلبات فوق 15 ر.ع",
                ),
            },
            Coupon {
                code: "ROAST20".into(),
                kind: DiscountKind::Percentage,
                value: Decimal::from(20),
                min_order: Some(omr(30_000)),
                expires_at: roast_expiry,
                description: Localized::new(
                    "20% off the 2025 roast season",
                    "خصم 20% لموسم تحميص 2025",
                ),
            },
            Coupon {
                code: "LOYALTY3".into(),
                kind: DiscountKind::Fixed,
                value: omr(3_000),
                min_order: None,
                expires_at: None,
                description: Localized::new(
                    "3 OMR reward for joining the loyalty club",
                    "مكافأة 3 ر.ع للانضمام إلى نادي الولاء",
                ),
            },
        ])
    }
}
