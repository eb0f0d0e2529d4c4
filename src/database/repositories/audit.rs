//! Audit log repository implementation

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::AuditEvent;
use crate::utils::errors::Result;

#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Append one event, stamped with the current time
    async fn record(&self, event: &AuditEvent, application_name: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditStore for AuditRepository {
    async fn record(&self, event: &AuditEvent, application_name: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_log (actor_id, action, table_name, row_id, client_addr, application_name)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#
        )
        .bind(event.actor_id)
        .bind(event.action.as_str())
        .bind(&event.table)
        .bind(event.row_id)
        .bind(event.source_ip.as_deref())
        .bind(event.description.as_deref().unwrap_or(application_name))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
