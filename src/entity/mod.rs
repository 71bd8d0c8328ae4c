pub mod checkout_snapshots;
pub mod coupon_usages;

pub use checkout_snapshots::Entity as CheckoutSnapshots;
pub use coupon_usages::Entity as CouponUsages;
