//! Parental billing service

use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::PaginationConfig;
use crate::database::BillingStore;
use crate::models::{
    Actor, AuditAction, BillingChanges, BillingFilter, BillingRecord, CreateBillingRequest, NewBilling,
    PageWindow, Paginated, UpdateBillingRequest,
};
use crate::services::audit::AuditService;
use crate::utils::errors::{KindergartenError, Result};
use crate::utils::helpers::{check_notes, format_payment_month, optional_text, parse_payment_month, require_text};
use crate::utils::logging::log_mutation;

const RECORD_NOT_FOUND: &str = "Запис батьківської плати не знайдено";

fn duplicate_message(parent_name: &str, payment_month: NaiveDate) -> String {
    format!(
        "Запис батьківської плати для \"{}\" на {} вже існує",
        parent_name,
        format_payment_month(payment_month)
    )
}

#[derive(Clone)]
pub struct BillingService {
    billing: Arc<dyn BillingStore>,
    audit: AuditService,
    pagination: PaginationConfig,
}

impl BillingService {
    pub fn new(billing: Arc<dyn BillingStore>, audit: AuditService, pagination: PaginationConfig) -> Self {
        Self {
            billing,
            audit,
            pagination,
        }
    }

    pub async fn list(&self, filter: &BillingFilter, actor: &Actor) -> Result<Paginated<BillingRecord>> {
        let window = PageWindow::resolve(&filter.list, &self.pagination);
        let (items, total) = self.billing.list(filter, window).await?;

        if filter.has_filters() {
            self.audit.row_event(actor, AuditAction::Search, BillingRecord::TABLE, None).await;
        }

        Ok(Paginated::new(items, total, window))
    }

    async fn find(&self, id: i64) -> Result<BillingRecord> {
        self.billing
            .find_by_id(id)
            .await?
            .ok_or_else(|| KindergartenError::NotFound(RECORD_NOT_FOUND.to_string()))
    }

    /// Fetch a record; billing reads are audited
    pub async fn get(&self, id: i64, actor: &Actor) -> Result<BillingRecord> {
        let record = self.find(id).await?;
        self.audit.row_event(actor, AuditAction::View, BillingRecord::TABLE, Some(id)).await;
        Ok(record)
    }

    pub async fn create(&self, request: CreateBillingRequest, actor: &Actor) -> Result<BillingRecord> {
        check_notes(request.notes.as_deref())?;
        let record = NewBilling {
            parent_name: require_text(&request.parent_name, "parent_name", 100)?,
            payment_month: parse_payment_month(&request.payment_month)?,
            current_debt: checked_amount(request.current_debt)?.unwrap_or(0.0),
            current_accrual: checked_amount(request.current_accrual)?.unwrap_or(0.0),
            current_payment: checked_amount(request.current_payment)?.unwrap_or(0.0),
            notes: request.notes,
        };

        let duplicate = duplicate_message(&record.parent_name, record.payment_month);
        if self
            .billing
            .find_by_parent_and_month(&record.parent_name, record.payment_month, None)
            .await?
            .is_some()
        {
            return Err(KindergartenError::Conflict(duplicate));
        }

        let created = self
            .billing
            .create(&record)
            .await
            .map_err(|e| e.or_conflict(&duplicate))?;

        log_mutation(BillingRecord::TABLE, "INSERT", created.id, actor.id);
        self.audit
            .row_event(actor, AuditAction::Insert, BillingRecord::TABLE, Some(created.id))
            .await;
        Ok(created)
    }

    pub async fn update(&self, id: i64, request: UpdateBillingRequest, actor: &Actor) -> Result<BillingRecord> {
        if request.is_empty() {
            return Err(KindergartenError::Validation("Немає полів для оновлення".to_string()));
        }
        check_notes(request.notes.as_deref())?;

        let existing = self.find(id).await?;
        let changes = BillingChanges {
            parent_name: optional_text(request.parent_name.as_deref(), "parent_name", 100)?,
            payment_month: request
                .payment_month
                .as_deref()
                .map(parse_payment_month)
                .transpose()?,
            current_debt: checked_amount(request.current_debt)?,
            current_accrual: checked_amount(request.current_accrual)?,
            current_payment: checked_amount(request.current_payment)?,
            notes: request.notes,
        };

        let parent_name = changes.parent_name.as_deref().unwrap_or(&existing.parent_name);
        let payment_month = changes.payment_month.unwrap_or(existing.payment_month);
        let duplicate = duplicate_message(parent_name, payment_month);

        if (parent_name != existing.parent_name || payment_month != existing.payment_month)
            && self
                .billing
                .find_by_parent_and_month(parent_name, payment_month, Some(id))
                .await?
                .is_some()
        {
            return Err(KindergartenError::Conflict(duplicate));
        }

        let updated = self
            .billing
            .update(id, &changes)
            .await
            .map_err(|e| e.or_conflict(&duplicate))?;

        log_mutation(BillingRecord::TABLE, "UPDATE", id, actor.id);
        self.audit.row_event(actor, AuditAction::Update, BillingRecord::TABLE, Some(id)).await;
        Ok(updated)
    }

    pub async fn delete(&self, id: i64, actor: &Actor) -> Result<()> {
        self.find(id).await?;

        if !self.billing.delete(id).await? {
            return Err(KindergartenError::NotFound(RECORD_NOT_FOUND.to_string()));
        }

        log_mutation(BillingRecord::TABLE, "DELETE", id, actor.id);
        self.audit.row_event(actor, AuditAction::Delete, BillingRecord::TABLE, Some(id)).await;
        Ok(())
    }
}

fn checked_amount(amount: Option<f64>) -> Result<Option<f64>> {
    match amount {
        Some(value) if !value.is_finite() || value < 0.0 => Err(KindergartenError::Validation(
            "Сума не може бути від'ємною".to_string(),
        )),
        amount => Ok(amount),
    }
}
