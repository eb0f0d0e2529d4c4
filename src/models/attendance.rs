//! Attendance model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::common::{has_text, ListParams};
use crate::utils::errors::KindergartenError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Sick,
    Vacation,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Sick => "sick",
            AttendanceStatus::Vacation => "vacation",
        }
    }

    /// Status after a tap in toggle mode: anything but present becomes present
    pub fn toggled(self) -> Self {
        match self {
            AttendanceStatus::Present => AttendanceStatus::Absent,
            _ => AttendanceStatus::Present,
        }
    }

    /// Status for an explicit `selected` flag
    pub fn from_selected(selected: bool) -> Self {
        if selected {
            AttendanceStatus::Present
        } else {
            AttendanceStatus::Absent
        }
    }
}

impl TryFrom<String> for AttendanceStatus {
    type Error = KindergartenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            "sick" => Ok(AttendanceStatus::Sick),
            "vacation" => Ok(AttendanceStatus::Vacation),
            other => Err(KindergartenError::Validation(format!(
                "Невідомий статус відвідуваності: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AttendanceRecord {
    pub id: i64,
    pub date: NaiveDate,
    pub child_id: i64,
    #[sqlx(try_from = "String")]
    pub attendance_status: AttendanceStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_name: Option<String>,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
}

impl AttendanceRecord {
    pub const TABLE: &'static str = "attendance";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAttendanceRequest {
    pub date: NaiveDate,
    pub child_id: i64,
    pub attendance_status: AttendanceStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAttendanceRequest {
    pub date: Option<NaiveDate>,
    pub child_id: Option<i64>,
    pub attendance_status: Option<AttendanceStatus>,
    pub notes: Option<String>,
}

impl UpdateAttendanceRequest {
    /// Change only the status, used by the mobile reconciliation
    pub fn status(status: AttendanceStatus) -> Self {
        Self {
            attendance_status: Some(status),
            ..Default::default()
        }
    }
}

/// One line of the daily attendance sheet: every child, recorded or not
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AttendanceSheetRow {
    pub child_id: i64,
    pub child_name: String,
    pub group_name: Option<String>,
    pub kindergarten_name: Option<String>,
    pub attendance_id: Option<i64>,
    #[sqlx(try_from = "String")]
    pub attendance_status: AttendanceStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceSheetFilter {
    #[serde(flatten)]
    pub list: ListParams,
    pub date: Option<NaiveDate>,
    pub child_name: Option<String>,
    pub group_name: Option<String>,
    pub kindergarten_name: Option<String>,
    pub attendance_status: Option<AttendanceStatus>,
}

impl AttendanceSheetFilter {
    pub fn has_filters(&self) -> bool {
        has_text(&self.child_name)
            || has_text(&self.group_name)
            || has_text(&self.kindergarten_name)
            || self.attendance_status.is_some()
    }
}

/// A child of a group together with its status for one day, feeds the mobile view
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RosterEntry {
    pub group_id: i64,
    pub group_name: String,
    pub child_id: i64,
    pub child_name: String,
    pub attendance_status: Option<String>,
}
