//! Debtor service

use std::sync::Arc;

use tracing::debug;

use crate::config::PaginationConfig;
use crate::database::DebtStore;
use crate::models::{Actor, AuditAction, Debt, DebtFilter, Debtor, PageWindow, Paginated};
use crate::services::audit::AuditService;
use crate::utils::errors::{KindergartenError, Result};

const DEBTOR_NOT_FOUND: &str = "Боржника не знайдено";

#[derive(Clone)]
pub struct DebtService {
    debts: Arc<dyn DebtStore>,
    audit: AuditService,
    pagination: PaginationConfig,
}

impl DebtService {
    pub fn new(debts: Arc<dyn DebtStore>, audit: AuditService, pagination: PaginationConfig) -> Self {
        Self {
            debts,
            audit,
            pagination,
        }
    }

    pub async fn list(&self, filter: &DebtFilter, actor: &Actor) -> Result<Paginated<Debt>> {
        let window = PageWindow::resolve(&filter.list, &self.pagination);
        let (items, total) = self.debts.list(filter, window).await?;

        if filter.has_filters() {
            self.audit.row_event(actor, AuditAction::Search, Debt::TABLE, None).await;
        }

        Ok(Paginated::new(items, total, window))
    }

    /// A debtor with their debts; viewing one is audited
    pub async fn get_debtor(&self, id: i64, actor: &Actor) -> Result<Debtor> {
        let debtor = self
            .debts
            .find_debtor(id)
            .await?
            .ok_or_else(|| KindergartenError::NotFound(DEBTOR_NOT_FOUND.to_string()))?;

        debug!(debtor_id = id, debts = debtor.debts.len(), total = debtor.total_debt(), "Loaded debtor");
        self.audit.row_event(actor, AuditAction::View, Debtor::TABLE, Some(id)).await;
        Ok(debtor)
    }
}
