use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::{
    coupons::catalog::{Coupon, CouponCatalog, DiscountKind},
    i18n::Localized,
    money::round_omr,
};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AppliedCoupon {
    #[serde(flatten)]
    pub coupon: Coupon,
}

impl AppliedCoupon {
    pub fn code(&self) -> &str {
        &self.coupon.code
    }

    pub fn discount(&self, subtotal: Decimal) -> Decimal {
        discount_for(&self.coupon, subtotal)
    }

    pub fn meets_minimum(&self, subtotal: Decimal) -> bool {
        self.coupon.min_order.is_none_or(|min| subtotal >= min)
    }
}

pub fn discount_for(coupon: &Coupon, subtotal: Decimal) -> Decimal {
    match coupon.kind {
        DiscountKind::Percentage => round_omr(subtotal * coupon.value / Decimal::ONE_HUNDRED),
        DiscountKind::Fixed => round_omr(coupon.value),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouponRejection {
    #[error("Enter a coupon code")]
    Empty,

    #[error("This coupon is already applied")]
    AlreadyApplied,

    #[error("Coupon code not found")]
    Unknown,

    #[error("You have already used this coupon")]
    AlreadyUsed,

    #[error("This coupon has expired")]
    Expired,

    #[error("Order must be at least {minimum} OMR to use this coupon")]
    BelowMinimum { minimum: Decimal },

    #[error("Coupons cannot be checked right now, please try again")]
    Unavailable,
}

impl CouponRejection {
    pub fn message(&self) -> Localized {
        let ar = match self {
            CouponRejection::Empty => "أدخل رمز الخصم".to_string(),
            CouponRejection::AlreadyApplied => "تم تطبيق هذا الرمز بالفعل".to_string(),
            CouponRejection::Unknown => "رمز الخصم غير موجود".to_string(),
            CouponRejection::AlreadyUsed => "لقد استخدمت هذا الرمز من قبل".to_string(),
            CouponRejection::Expired => "انتهت صلاحية هذا الرمز".to_string(),
            CouponRejection::BelowMinimum { minimum } => {
                format!("يجب ألا يقل الطلب عن {minimum} ر.ع لاستخدام هذا الرمز")
            }
            CouponRejection::Unavailable => {
                "لا يمكن التحقق من الرموز حالياً، حاول مرة أخرى".to_string()
            }
        };
        Localized::new(self.to_string(), ar)
    }
}

/// Everything a coupon check looks at besides the catalog itself.
#[derive(Debug, Clone, Copy)]
pub struct CouponContext<'a> {
    pub subtotal: Decimal,
    pub applied: Option<&'a AppliedCoupon>,
    /// Codes this shopper has redeemed before; `None` for guests.
    pub used_codes: Option<&'a HashSet<String>>,
    pub now: DateTime<Utc>,
}

impl CouponCatalog {
    pub fn evaluate(
        &self,
        code: &str,
        ctx: CouponContext<'_>,
    ) -> Result<AppliedCoupon, CouponRejection> {
        let code = code.trim();
        if code.is_empty() {
            return Err(CouponRejection::Empty);
        }
        if ctx
            .applied
            .is_some_and(|applied| applied.code().eq_ignore_ascii_case(code))
        {
            return Err(CouponRejection::AlreadyApplied);
        }
        let coupon = self.find(code).ok_or(CouponRejection::Unknown)?;
        if ctx
            .used_codes
            .is_some_and(|used| used.contains(&coupon.code))
        {
            return Err(CouponRejection::AlreadyUsed);
        }
        if coupon.expires_at.is_some_and(|expiry| ctx.now > expiry) {
            return Err(CouponRejection::Expired);
        }
        if let Some(minimum) = coupon.min_order
            && ctx.subtotal < minimum
        {
            return Err(CouponRejection::BelowMinimum { minimum });
        }
        Ok(AppliedCoupon {
            coupon: coupon.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::omr;

    fn ctx(subtotal: Decimal) -> CouponContext<'static> {
        CouponContext {
            subtotal,
            applied: None,
            used_codes: None,
            now: Utc::now(),
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let catalog = CouponCatalog::default();
        let applied = catalog.evaluate("  thanks10 ", ctx(omr(50_000))).unwrap();
        assert_eq!(applied.code(), "THANKS10");
        assert_eq!(applied.discount(omr(50_000)), omr(5_000));
    }

    #[test]
    fn fixed_discount_ignores_subtotal() {
        let catalog = CouponCatalog::default();
        let applied = catalog.evaluate("WELCOME5", ctx(omr(15_000))).unwrap();
        assert_eq!(applied.discount(omr(15_000)), omr(5_000));
        assert_eq!(applied.discount(omr(90_000)), omr(5_000));
    }

    #[test]
    fn rejection_messages_are_bilingual() {
        let msg = CouponRejection::BelowMinimum { minimum: omr(15_000) }.message();
        assert_eq!(msg.en, "Order must be at least 15.000 OMR to use this coupon");
        assert!(msg.ar.contains("15.000"));
    }
}
