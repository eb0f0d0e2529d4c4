//! Kindergarten group model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::common::{has_text, ListParams};
use crate::utils::errors::KindergartenError;

/// Age band of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupType {
    Young,
    Middle,
    Senior,
    Preparatory,
}

impl GroupType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupType::Young => "young",
            GroupType::Middle => "middle",
            GroupType::Senior => "senior",
            GroupType::Preparatory => "preparatory",
        }
    }
}

impl TryFrom<String> for GroupType {
    type Error = KindergartenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "young" => Ok(GroupType::Young),
            "middle" => Ok(GroupType::Middle),
            "senior" => Ok(GroupType::Senior),
            "preparatory" => Ok(GroupType::Preparatory),
            other => Err(KindergartenError::Validation(format!("Невідомий тип групи: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    pub id: i64,
    pub kindergarten_name: String,
    pub group_name: String,
    #[sqlx(try_from = "String")]
    pub group_type: GroupType,
    pub created_at: DateTime<Utc>,
}

impl Group {
    pub const TABLE: &'static str = "kindergarten_groups";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    pub kindergarten_name: String,
    pub group_name: String,
    pub group_type: GroupType,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateGroupRequest {
    pub kindergarten_name: Option<String>,
    pub group_name: Option<String>,
    pub group_type: Option<GroupType>,
}

impl UpdateGroupRequest {
    pub fn is_empty(&self) -> bool {
        self.kindergarten_name.is_none() && self.group_name.is_none() && self.group_type.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupFilter {
    #[serde(flatten)]
    pub list: ListParams,
    pub kindergarten_name: Option<String>,
    pub group_name: Option<String>,
    pub group_type: Option<GroupType>,
}

impl GroupFilter {
    pub fn has_filters(&self) -> bool {
        has_text(&self.kindergarten_name) || has_text(&self.group_name) || self.group_type.is_some()
    }
}
