//! Mobile attendance reconciliation
//!
//! Applies a decoded [`AttendanceBatch`] child by child. Items are written
//! one at a time with no surrounding transaction: a failure is recorded in
//! the summary and the batch carries on with the next child.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::database::{AttendanceStore, ChildStore, GroupStore};
use crate::models::{
    Actor, AttendanceBatch, AttendanceRecord, AttendanceStatus, AuditAction, AuditEvent, BatchDetails, BatchError,
    BatchKind, BatchSummary, ChildOutcome, ChildSelection, CreateAttendanceRequest, GroupSelection,
    ReconciliationAction, UpdateAttendanceRequest,
};
use crate::services::attendance::{CHILD_NOT_FOUND, RECORD_EXISTS};
use crate::services::audit::AuditService;
use crate::utils::errors::{KindergartenError, Result};
use crate::utils::logging::log_batch_summary;

const GROUP_NOT_FOUND: &str = "Групу не знайдено";
const WRONG_GROUP: &str = "Дитина не належить до вказаної групи";

#[derive(Clone)]
pub struct ReconciliationService {
    attendance: Arc<dyn AttendanceStore>,
    children: Arc<dyn ChildStore>,
    groups: Arc<dyn GroupStore>,
    audit: AuditService,
}

impl ReconciliationService {
    pub fn new(
        attendance: Arc<dyn AttendanceStore>,
        children: Arc<dyn ChildStore>,
        groups: Arc<dyn GroupStore>,
        audit: AuditService,
    ) -> Self {
        Self {
            attendance,
            children,
            groups,
            audit,
        }
    }

    /// Apply every item of `batch`, collecting per-item results and errors
    pub async fn apply(&self, batch: AttendanceBatch, actor: &Actor) -> BatchSummary {
        let format = batch.kind.format();
        debug!(date = %batch.date, format, "Applying attendance batch");

        let mut details = BatchDetails::default();
        match &batch.kind {
            BatchKind::Toggle { child_ids } => {
                for &child_id in child_ids {
                    match self.toggle_child(batch.date, child_id).await {
                        Ok(outcome) => details.results.push(outcome),
                        Err(e) => details.errors.push(BatchError {
                            child_id: Some(child_id),
                            group_id: None,
                            error: e.client_message(),
                        }),
                    }
                }
            }
            BatchKind::Explicit { groups } => {
                for group in groups {
                    self.apply_group(batch.date, group, &mut details).await;
                }
            }
        }

        log_batch_summary(format, details.results.len(), details.errors.len(), actor.id);
        self.audit
            .record(
                AuditEvent::new(AuditAction::Update, AttendanceRecord::TABLE, None)
                    .by(actor)
                    .with_description("Мобільний додаток - збереження відвідуваності"),
            )
            .await;

        BatchSummary::new(format, details)
    }

    /// Flip present/absent, or mark a first-time child present
    async fn toggle_child(&self, date: NaiveDate, child_id: i64) -> Result<ChildOutcome> {
        if self.children.find_by_id(child_id).await?.is_none() {
            return Err(KindergartenError::NotFound(CHILD_NOT_FOUND.to_string()));
        }

        match self.attendance.find_by_child_and_date(child_id, date).await? {
            Some(record) => {
                let new_status = record.attendance_status.toggled();
                self.attendance
                    .update(record.id, &UpdateAttendanceRequest::status(new_status))
                    .await?;

                Ok(ChildOutcome {
                    child_id,
                    group_id: None,
                    action: ReconciliationAction::Toggled,
                    old_status: Some(record.attendance_status),
                    new_status,
                })
            }
            None => {
                self.create_record(date, child_id, AttendanceStatus::Present).await?;

                Ok(ChildOutcome {
                    child_id,
                    group_id: None,
                    action: ReconciliationAction::Created,
                    old_status: None,
                    new_status: AttendanceStatus::Present,
                })
            }
        }
    }

    async fn apply_group(&self, date: NaiveDate, group: &GroupSelection, details: &mut BatchDetails) {
        let missing = match self.groups.find_by_id(group.id).await {
            Ok(Some(_)) => None,
            Ok(None) => Some(GROUP_NOT_FOUND.to_string()),
            Err(e) => Some(e.client_message()),
        };

        if let Some(error) = missing {
            details.errors.push(BatchError {
                child_id: None,
                group_id: Some(group.id),
                error,
            });
            return;
        }

        for selection in &group.group {
            match self.set_child(date, group.id, selection).await {
                Ok(outcome) => details.results.push(outcome),
                Err(e) => details.errors.push(BatchError {
                    child_id: Some(selection.id),
                    group_id: Some(group.id),
                    error: e.client_message(),
                }),
            }
        }
    }

    /// Bring one child to the status its `selected` flag asks for
    async fn set_child(&self, date: NaiveDate, group_id: i64, selection: &ChildSelection) -> Result<ChildOutcome> {
        let child = self
            .children
            .find_by_id(selection.id)
            .await?
            .ok_or_else(|| KindergartenError::NotFound(CHILD_NOT_FOUND.to_string()))?;

        if child.group_id != Some(group_id) {
            return Err(KindergartenError::Validation(WRONG_GROUP.to_string()));
        }

        let target = AttendanceStatus::from_selected(selection.selected);
        let outcome = |action, old_status| ChildOutcome {
            child_id: child.id,
            group_id: Some(group_id),
            action,
            old_status,
            new_status: target,
        };

        match self.attendance.find_by_child_and_date(child.id, date).await? {
            Some(record) if record.attendance_status == target => {
                Ok(outcome(ReconciliationAction::Unchanged, Some(record.attendance_status)))
            }
            Some(record) => {
                self.attendance
                    .update(record.id, &UpdateAttendanceRequest::status(target))
                    .await?;
                Ok(outcome(ReconciliationAction::Updated, Some(record.attendance_status)))
            }
            None => {
                self.create_record(date, child.id, target).await?;
                Ok(outcome(ReconciliationAction::Created, None))
            }
        }
    }

    async fn create_record(&self, date: NaiveDate, child_id: i64, status: AttendanceStatus) -> Result<()> {
        self.attendance
            .create(&CreateAttendanceRequest {
                date,
                child_id,
                attendance_status: status,
                notes: None,
            })
            .await
            .map_err(|e| e.or_conflict(RECORD_EXISTS))?;
        Ok(())
    }
}
