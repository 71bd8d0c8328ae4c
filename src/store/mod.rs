//! Per-user checkout state that outlives a session: which coupons a shopper
//! has spent and the last order they submitted.

mod memory;
mod orm;

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::checkout::CheckoutOrder;

pub use memory::MemoryStore;
pub use orm::OrmStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("coupon {0} was already redeemed by this user")]
    CouponUsed(String),

    #[error("store database error: {0}")]
    Db(#[from] sea_orm::DbErr),

    #[error("stored order could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait]
pub trait CheckoutStore: Send + Sync {
    /// Upper-cased codes the user has redeemed.
    async fn used_coupons(&self, user_id: Uuid) -> Result<HashSet<String>, StoreError>;

    /// Record a submitted order: redeem its coupon (failing with
    /// [`StoreError::CouponUsed`] if the user already spent it) and replace the
    /// user's last-order snapshot. Either both writes land or neither does.
    async fn commit_order(&self, order: &CheckoutOrder) -> Result<(), StoreError>;

    async fn last_order(&self, user_id: Uuid) -> Result<Option<CheckoutOrder>, StoreError>;
}
