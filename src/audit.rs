use serde_json::Value;
use uuid::Uuid;

use crate::db::DbPool;

/// Something worth keeping a trail of: an account event or a submitted
/// checkout.
#[derive(Debug)]
pub struct AuditEvent<'a> {
    pub action: &'a str,
    pub user_id: Option<Uuid>,
    pub resource: Option<&'a str>,
    pub metadata: Option<Value>,
}

impl<'a> AuditEvent<'a> {
    pub fn new(action: &'a str, user_id: Uuid) -> Self {
        Self {
            action,
            user_id: Some(user_id),
            resource: None,
            metadata: None,
        }
    }

    pub fn on(mut self, resource: &'a str) -> Self {
        self.resource = Some(resource);
        self
    }

    pub fn with(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

async fn insert(pool: &DbPool, event: AuditEvent<'_>) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(event.user_id)
    .bind(event.action)
    .bind(event.resource)
    .bind(event.metadata)
    .execute(pool)
    .await?;
    Ok(())
}

/// Audit writes never fail the request that triggered them.
pub async fn record(pool: &DbPool, event: AuditEvent<'_>) {
    let action = event.action;
    if let Err(err) = insert(pool, event).await {
        tracing::warn!(error = %err, action, "audit log failed");
    }
}
