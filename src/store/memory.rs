use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CheckoutStore, StoreError};
use crate::checkout::CheckoutOrder;

#[derive(Debug, Default)]
struct Tables {
    coupons: HashMap<Uuid, HashSet<String>>,
    orders: HashMap<Uuid, CheckoutOrder>,
}

/// Process-local store for tests. One lock guards both tables so a commit is
/// all-or-nothing.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CheckoutStore for MemoryStore {
    async fn used_coupons(&self, user_id: Uuid) -> Result<HashSet<String>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .coupons
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn commit_order(&self, order: &CheckoutOrder) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(code) = &order.coupon_code {
            let code = code.to_ascii_uppercase();
            let used = tables.coupons.entry(order.user_id).or_default();
            if used.contains(&code) {
                return Err(StoreError::CouponUsed(code));
            }
            used.insert(code);
        }
        tables.orders.insert(order.user_id, order.clone());
        Ok(())
    }

    async fn last_order(&self, user_id: Uuid) -> Result<Option<CheckoutOrder>, StoreError> {
        Ok(self.tables.read().await.orders.get(&user_id).cloned())
    }
}
