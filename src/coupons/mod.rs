pub mod catalog;
pub mod evaluator;

pub use catalog::{Coupon, CouponCatalog, DiscountKind};
pub use evaluator::{AppliedCoupon, CouponContext, CouponRejection, discount_for};
