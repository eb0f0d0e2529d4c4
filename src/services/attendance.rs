//! Attendance service: the daily sheet, record CRUD and the mobile read view

use std::sync::Arc;

use tracing::debug;

use crate::config::PaginationConfig;
use crate::database::{AttendanceStore, ChildStore};
use crate::models::{
    Actor, AttendanceRecord, AttendanceSheetFilter, AttendanceSheetRow, AttendanceStatus, AuditAction,
    AuditEvent, CreateAttendanceRequest, MobileAttendanceView, MobileChildView, MobileGroupView, PageWindow,
    Paginated, RosterEntry, UpdateAttendanceRequest,
};
use crate::services::audit::AuditService;
use crate::utils::errors::{KindergartenError, Result};
use crate::utils::helpers::{check_notes, timestamp_to_date, today};
use crate::utils::logging::log_mutation;

pub(crate) const RECORD_NOT_FOUND: &str = "Запис відвідуваності не знайдено";
pub(crate) const RECORD_EXISTS: &str = "Запис відвідуваності на цю дату для цієї дитини вже існує";
pub(crate) const CHILD_NOT_FOUND: &str = "Дитину не знайдено";

#[derive(Clone)]
pub struct AttendanceService {
    attendance: Arc<dyn AttendanceStore>,
    children: Arc<dyn ChildStore>,
    audit: AuditService,
    pagination: PaginationConfig,
}

impl AttendanceService {
    pub fn new(
        attendance: Arc<dyn AttendanceStore>,
        children: Arc<dyn ChildStore>,
        audit: AuditService,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            attendance,
            children,
            audit,
            pagination,
        }
    }

    /// Attendance sheet for one day, today (UTC) unless the filter names a date
    pub async fn list_sheet(
        &self,
        filter: &AttendanceSheetFilter,
        actor: &Actor,
    ) -> Result<Paginated<AttendanceSheetRow>> {
        let window = PageWindow::resolve(&filter.list, &self.pagination);
        let date = filter.date.unwrap_or_else(today);
        let (items, total) = self.attendance.list_sheet(filter, date, window).await?;

        if filter.has_filters() {
            self.audit
                .row_event(actor, AuditAction::Search, AttendanceRecord::TABLE, None)
                .await;
        }

        Ok(Paginated::new(items, total, window))
    }

    pub async fn get(&self, id: i64) -> Result<AttendanceRecord> {
        self.attendance
            .find_by_id(id)
            .await?
            .ok_or_else(|| KindergartenError::NotFound(RECORD_NOT_FOUND.to_string()))
    }

    async fn ensure_child(&self, child_id: i64) -> Result<()> {
        match self.children.find_by_id(child_id).await? {
            Some(_) => Ok(()),
            None => Err(KindergartenError::NotFound(CHILD_NOT_FOUND.to_string())),
        }
    }

    pub async fn create(&self, request: CreateAttendanceRequest, actor: &Actor) -> Result<AttendanceRecord> {
        check_notes(request.notes.as_deref())?;
        self.ensure_child(request.child_id).await?;

        if self
            .attendance
            .find_by_child_and_date(request.child_id, request.date)
            .await?
            .is_some()
        {
            return Err(KindergartenError::Conflict(RECORD_EXISTS.to_string()));
        }

        let record = self
            .attendance
            .create(&request)
            .await
            .map_err(|e| e.or_conflict(RECORD_EXISTS))?;

        log_mutation(AttendanceRecord::TABLE, "INSERT", record.id, actor.id);
        self.audit
            .row_event(actor, AuditAction::Insert, AttendanceRecord::TABLE, Some(record.id))
            .await;
        Ok(record)
    }

    pub async fn update(
        &self,
        id: i64,
        request: UpdateAttendanceRequest,
        actor: &Actor,
    ) -> Result<AttendanceRecord> {
        check_notes(request.notes.as_deref())?;
        let existing = self.get(id).await?;

        if let Some(child_id) = request.child_id {
            self.ensure_child(child_id).await?;
        }

        let child_id = request.child_id.unwrap_or(existing.child_id);
        let date = request.date.unwrap_or(existing.date);
        if child_id != existing.child_id || date != existing.date {
            if let Some(other) = self.attendance.find_by_child_and_date(child_id, date).await? {
                if other.id != id {
                    return Err(KindergartenError::Conflict(RECORD_EXISTS.to_string()));
                }
            }
        }

        let record = self
            .attendance
            .update(id, &request)
            .await
            .map_err(|e| e.or_conflict(RECORD_EXISTS))?;

        log_mutation(AttendanceRecord::TABLE, "UPDATE", id, actor.id);
        self.audit
            .row_event(actor, AuditAction::Update, AttendanceRecord::TABLE, Some(id))
            .await;
        Ok(record)
    }

    pub async fn delete(&self, id: i64, actor: &Actor) -> Result<()> {
        self.get(id).await?;

        if !self.attendance.delete(id).await? {
            return Err(KindergartenError::NotFound(RECORD_NOT_FOUND.to_string()));
        }

        log_mutation(AttendanceRecord::TABLE, "DELETE", id, actor.id);
        self.audit
            .row_event(actor, AuditAction::Delete, AttendanceRecord::TABLE, Some(id))
            .await;
        Ok(())
    }

    /// Groups with their children and whether each is marked present on the day of `timestamp`
    pub async fn mobile_view(&self, timestamp: i64, actor: &Actor) -> Result<MobileAttendanceView> {
        let date = timestamp_to_date(timestamp)?;
        debug!(%date, "Building mobile attendance view");

        let roster = self.attendance.roster_for_date(date).await?;

        if actor.id.is_some() {
            self.audit
                .record(
                    AuditEvent::new(AuditAction::View, AttendanceRecord::TABLE, None)
                        .by(actor)
                        .with_description("Мобільний додаток - перегляд відвідуваності"),
                )
                .await;
        }

        Ok(MobileAttendanceView {
            date: timestamp,
            groups: group_roster(roster),
        })
    }
}

/// Fold flat roster rows, already ordered by group, into per-group lists
fn group_roster(roster: Vec<RosterEntry>) -> Vec<MobileGroupView> {
    let mut groups: Vec<MobileGroupView> = Vec::new();

    for entry in roster {
        let selected = entry.attendance_status.as_deref() == Some(AttendanceStatus::Present.as_str());
        let child = MobileChildView {
            id: entry.child_id,
            name: entry.child_name,
            selected,
        };

        match groups.last_mut() {
            Some(group) if group.id == entry.group_id => group.group.push(child),
            _ => groups.push(MobileGroupView {
                id: entry.group_id,
                name: entry.group_name,
                group: vec![child],
            }),
        }
    }

    groups
}
