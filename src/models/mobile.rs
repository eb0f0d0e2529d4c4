//! Wire types of the mobile attendance endpoints
//!
//! Two request shapes are accepted on the same endpoint. Older clients send
//! `children`, a list of ids to toggle; newer ones send `groups` with an
//! explicit `selected` flag per child. Both are decoded into
//! [`AttendanceBatch`] before any work is done.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::attendance::AttendanceStatus;
use crate::utils::errors::{KindergartenError, Result};
use crate::utils::helpers::timestamp_to_date;

/// Raw body of `POST /attendance/mobile`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobileAttendanceRequest {
    pub date: i64,
    pub children: Option<Vec<i64>>,
    pub groups: Option<Vec<GroupSelection>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSelection {
    pub id: i64,
    #[serde(default)]
    pub group: Vec<ChildSelection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildSelection {
    pub id: i64,
    pub selected: bool,
}

/// A decoded mobile submission
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceBatch {
    pub date: NaiveDate,
    pub kind: BatchKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BatchKind {
    /// Each tap flips present/absent
    Toggle { child_ids: Vec<i64> },
    /// Each child carries its target status
    Explicit { groups: Vec<GroupSelection> },
}

impl BatchKind {
    /// Name of the wire format, echoed back in the summary
    pub fn format(&self) -> &'static str {
        match self {
            BatchKind::Toggle { .. } => "children",
            BatchKind::Explicit { .. } => "groups",
        }
    }
}

impl MobileAttendanceRequest {
    pub fn into_batch(self) -> Result<AttendanceBatch> {
        let date = timestamp_to_date(self.date)?;

        let kind = match (self.children, self.groups) {
            (Some(child_ids), None) => BatchKind::Toggle { child_ids },
            (None, Some(groups)) => BatchKind::Explicit { groups },
            (Some(_), Some(_)) => {
                return Err(KindergartenError::Validation(
                    "Запит має містити або children, або groups, але не обидва".to_string(),
                ))
            }
            (None, None) => {
                return Err(KindergartenError::Validation(
                    "Запит має містити children або groups".to_string(),
                ))
            }
        };

        Ok(AttendanceBatch { date, kind })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconciliationAction {
    Toggled,
    Created,
    Updated,
    Unchanged,
}

/// Result of one child in a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildOutcome {
    pub child_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
    pub action: ReconciliationAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_status: Option<AttendanceStatus>,
    pub new_status: AttendanceStatus,
}

/// A child or group that could not be applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchDetails {
    pub results: Vec<ChildOutcome>,
    pub errors: Vec<BatchError>,
}

/// Response of `POST /attendance/mobile`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub success: usize,
    pub errors: usize,
    pub format: String,
    pub details: BatchDetails,
}

impl BatchSummary {
    pub fn new(format: &str, details: BatchDetails) -> Self {
        Self {
            success: details.results.len(),
            errors: details.errors.len(),
            format: format.to_string(),
            details,
        }
    }
}

/// Response of `GET /attendance/mobile/:date`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobileAttendanceView {
    pub date: i64,
    pub groups: Vec<MobileGroupView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobileGroupView {
    pub id: i64,
    pub name: String,
    pub group: Vec<MobileChildView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobileChildView {
    pub id: i64,
    pub name: String,
    pub selected: bool,
}
