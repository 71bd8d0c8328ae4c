use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::{CheckoutStore, StoreError};
use crate::{
    checkout::CheckoutOrder,
    entity::{
        CheckoutSnapshots, CouponUsages, checkout_snapshots::ActiveModel as SnapshotActive,
        coupon_usages::{ActiveModel as UsageActive, Column as UsageCol},
    },
};

/// Postgres-backed store. Order commits run in one transaction.
#[derive(Clone)]
pub struct OrmStore {
    orm: DatabaseConnection,
}

impl OrmStore {
    pub fn new(orm: DatabaseConnection) -> Self {
        Self { orm }
    }
}

#[async_trait]
impl CheckoutStore for OrmStore {
    async fn used_coupons(&self, user_id: Uuid) -> Result<HashSet<String>, StoreError> {
        let codes = CouponUsages::find()
            .filter(UsageCol::UserId.eq(user_id))
            .all(&self.orm)
            .await?
            .into_iter()
            .map(|usage| usage.code)
            .collect();
        Ok(codes)
    }

    async fn commit_order(&self, order: &CheckoutOrder) -> Result<(), StoreError> {
        let payload = serde_json::to_value(order)?;
        let txn = self.orm.begin().await?;

        if let Some(code) = &order.coupon_code {
            let code = code.to_ascii_uppercase();
            let spent = CouponUsages::find()
                .filter(
                    Condition::all()
                        .add(UsageCol::UserId.eq(order.user_id))
                        .add(UsageCol::Code.eq(code.clone())),
                )
                .one(&txn)
                .await?;
            if spent.is_some() {
                txn.rollback().await?;
                return Err(StoreError::CouponUsed(code));
            }
            UsageActive {
                id: Set(Uuid::new_v4()),
                user_id: Set(order.user_id),
                code: Set(code),
                used_at: Set(Utc::now().into()),
            }
            .insert(&txn)
            .await?;
        }

        match CheckoutSnapshots::find_by_id(order.user_id).one(&txn).await? {
            Some(model) => {
                let mut active: SnapshotActive = model.into();
                active.order_id = Set(order.id);
                active.payload = Set(payload);
                active.updated_at = Set(Utc::now().into());
                active.update(&txn).await?;
            }
            None => {
                SnapshotActive {
                    user_id: Set(order.user_id),
                    order_id: Set(order.id),
                    payload: Set(payload),
                    updated_at: Set(Utc::now().into()),
                }
                .insert(&txn)
                .await?;
            }
        }

        txn.commit().await?;
        Ok(())
    }

    async fn last_order(&self, user_id: Uuid) -> Result<Option<CheckoutOrder>, StoreError> {
        let snapshot = CheckoutSnapshots::find_by_id(user_id).one(&self.orm).await?;
        match snapshot {
            Some(model) => Ok(Some(serde_json::from_value(model.payload)?)),
            None => Ok(None),
        }
    }
}
