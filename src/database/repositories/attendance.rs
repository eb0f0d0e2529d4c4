//! Attendance repository implementation

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::database::filter::{fetch_page, ListQuery, ATTENDANCE_SHEET_SORT};
use crate::models::{
    AttendanceRecord, AttendanceSheetFilter, AttendanceSheetRow, CreateAttendanceRequest, PageWindow,
    RosterEntry, UpdateAttendanceRequest,
};
use crate::utils::errors::Result;

const RECORD_COLUMNS: &str =
    "a.id, a.date, a.child_id, a.attendance_status, a.notes, a.created_at, a.updated_at";

/// Storage operations on attendance records.
///
/// Statuses arrive already typed; nothing here re-validates them.
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Record joined with the child's and group's names
    async fn find_by_id(&self, id: i64) -> Result<Option<AttendanceRecord>>;

    async fn find_by_child_and_date(&self, child_id: i64, date: NaiveDate) -> Result<Option<AttendanceRecord>>;

    /// Every child with its status on `date`; a missing record reads as absent
    async fn list_sheet(
        &self,
        filter: &AttendanceSheetFilter,
        date: NaiveDate,
        window: PageWindow,
    ) -> Result<(Vec<AttendanceSheetRow>, i64)>;

    /// Children of non-empty groups with their status on `date`, by group then child name
    async fn roster_for_date(&self, date: NaiveDate) -> Result<Vec<RosterEntry>>;

    async fn create(&self, record: &CreateAttendanceRequest) -> Result<AttendanceRecord>;

    async fn update(&self, id: i64, changes: &UpdateAttendanceRequest) -> Result<AttendanceRecord>;

    async fn delete(&self, id: i64) -> Result<bool>;
}

#[derive(Debug, Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn sheet_query(select: &str, filter: &AttendanceSheetFilter, date: NaiveDate) -> ListQuery {
    let mut query = ListQuery::new(select);
    query
        .push(
            " FROM children_roster c \
             LEFT JOIN kindergarten_groups g ON g.id = c.group_id \
             LEFT JOIN attendance a ON a.child_id = c.id AND a.date = ",
        )
        .bind(date)
        .ilike("c.child_name", filter.child_name.as_deref())
        .ilike("g.group_name", filter.group_name.as_deref())
        .ilike("g.kindergarten_name", filter.kindergarten_name.as_deref())
        .eq(
            "COALESCE(a.attendance_status, 'absent')",
            filter.attendance_status.map(|s| s.as_str()),
        );
    query
}

#[async_trait]
impl AttendanceStore for AttendanceRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<AttendanceRecord>> {
        let record = sqlx::query_as::<_, AttendanceRecord>(&format!(
            r#"
            SELECT {}, c.child_name, g.group_name
            FROM attendance a
            LEFT JOIN children_roster c ON c.id = a.child_id
            LEFT JOIN kindergarten_groups g ON g.id = c.group_id
            WHERE a.id = $1
            "#,
            RECORD_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_by_child_and_date(&self, child_id: i64, date: NaiveDate) -> Result<Option<AttendanceRecord>> {
        let record = sqlx::query_as::<_, AttendanceRecord>(&format!(
            "SELECT {} FROM attendance a WHERE a.child_id = $1 AND a.date = $2",
            RECORD_COLUMNS
        ))
        .bind(child_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list_sheet(
        &self,
        filter: &AttendanceSheetFilter,
        date: NaiveDate,
        window: PageWindow,
    ) -> Result<(Vec<AttendanceSheetRow>, i64)> {
        let count = sheet_query("SELECT COUNT(*)", filter, date);
        let mut rows = sheet_query(
            "SELECT c.id AS child_id, c.child_name, g.group_name, g.kindergarten_name, \
             a.id AS attendance_id, COALESCE(a.attendance_status, 'absent') AS attendance_status",
            filter,
            date,
        );
        rows.order_by(
            &ATTENDANCE_SHEET_SORT,
            filter.list.sort_by.as_deref(),
            filter.list.sort_direction.as_deref(),
        )
        .paginate(window);

        fetch_page(&self.pool, AttendanceRecord::TABLE, rows, count).await
    }

    async fn roster_for_date(&self, date: NaiveDate) -> Result<Vec<RosterEntry>> {
        let entries = sqlx::query_as::<_, RosterEntry>(
            r#"
            SELECT g.id AS group_id, g.group_name, c.id AS child_id, c.child_name, a.attendance_status
            FROM kindergarten_groups g
            JOIN children_roster c ON c.group_id = g.id
            LEFT JOIN attendance a ON a.child_id = c.id AND a.date = $1
            ORDER BY g.group_name, g.id, c.child_name, c.id
            "#
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn create(&self, record: &CreateAttendanceRequest) -> Result<AttendanceRecord> {
        let created = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            INSERT INTO attendance (date, child_id, attendance_status, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING id, date, child_id, attendance_status, notes, created_at, updated_at
            "#
        )
        .bind(record.date)
        .bind(record.child_id)
        .bind(record.attendance_status.as_str())
        .bind(record.notes.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update(&self, id: i64, changes: &UpdateAttendanceRequest) -> Result<AttendanceRecord> {
        let updated = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            UPDATE attendance
            SET date = COALESCE($2, date),
                child_id = COALESCE($3, child_id),
                attendance_status = COALESCE($4, attendance_status),
                notes = COALESCE($5, notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, date, child_id, attendance_status, notes, created_at, updated_at
            "#
        )
        .bind(id)
        .bind(changes.date)
        .bind(changes.child_id)
        .bind(changes.attendance_status.map(|s| s.as_str()))
        .bind(changes.notes.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM attendance WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
