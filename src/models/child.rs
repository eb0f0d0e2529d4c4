//! Child roster model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::common::{has_text, ListParams};

/// A child on the roster, with its group's names joined in
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Child {
    pub id: i64,
    pub child_name: String,
    pub parent_name: String,
    pub phone_number: Option<String>,
    pub group_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub group_name: Option<String>,
    pub kindergarten_name: Option<String>,
}

impl Child {
    pub const TABLE: &'static str = "children_roster";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChildRequest {
    pub child_name: String,
    pub parent_name: String,
    pub phone_number: Option<String>,
    pub group_id: i64,
    /// Optional cross-check against the group's kindergarten
    pub kindergarten_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateChildRequest {
    pub child_name: Option<String>,
    pub parent_name: Option<String>,
    pub phone_number: Option<String>,
    pub group_id: Option<i64>,
    pub kindergarten_name: Option<String>,
}

/// Columns written by an insert
#[derive(Debug, Clone)]
pub struct NewChild {
    pub child_name: String,
    pub parent_name: String,
    pub phone_number: Option<String>,
    pub group_id: i64,
}

/// Columns written by an update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct ChildChanges {
    pub child_name: Option<String>,
    pub parent_name: Option<String>,
    pub phone_number: Option<String>,
    pub group_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChildFilter {
    #[serde(flatten)]
    pub list: ListParams,
    pub child_name: Option<String>,
    pub parent_name: Option<String>,
    pub phone_number: Option<String>,
    pub group_id: Option<i64>,
    pub kindergarten_name: Option<String>,
}

impl ChildFilter {
    pub fn has_filters(&self) -> bool {
        has_text(&self.child_name)
            || has_text(&self.parent_name)
            || has_text(&self.phone_number)
            || self.group_id.is_some()
            || has_text(&self.kindergarten_name)
    }
}
