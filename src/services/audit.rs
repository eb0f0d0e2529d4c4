//! Audit trail service
//!
//! Every write to the audit log is best-effort: a failure is logged and
//! swallowed so it can never fail the request that triggered it.

use std::sync::Arc;

use tracing::debug;

use crate::config::AuditConfig;
use crate::database::AuditStore;
use crate::models::{Actor, AuditAction, AuditEvent};
use crate::utils::logging::log_audit_failure;

#[derive(Clone)]
pub struct AuditService {
    store: Arc<dyn AuditStore>,
    config: AuditConfig,
}

impl AuditService {
    pub fn new(store: Arc<dyn AuditStore>, config: AuditConfig) -> Self {
        Self { store, config }
    }

    /// Persist `event`, never failing
    pub async fn record(&self, event: AuditEvent) {
        if !self.config.enabled {
            return;
        }

        debug!(
            table = %event.table,
            action = event.action.as_str(),
            row_id = event.row_id,
            actor_id = event.actor_id,
            "Recording audit event"
        );

        if let Err(e) = self.store.record(&event, &self.config.application_name).await {
            log_audit_failure(&event.table, event.action.as_str(), &e.to_string());
        }
    }

    /// Shorthand for a row-level event attributed to `actor`
    pub async fn row_event(&self, actor: &Actor, action: AuditAction, table: &str, row_id: Option<i64>) {
        self.record(AuditEvent::new(action, table, row_id).by(actor)).await;
    }
}
