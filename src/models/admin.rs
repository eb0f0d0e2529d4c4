//! Administrator and educator accounts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::common::{has_text, ListParams};
use crate::utils::errors::KindergartenError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminRole {
    #[default]
    Educator,
    Admin,
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::Educator => "educator",
            AdminRole::Admin => "admin",
        }
    }
}

impl TryFrom<String> for AdminRole {
    type Error = KindergartenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "educator" => Ok(AdminRole::Educator),
            "admin" => Ok(AdminRole::Admin),
            other => Err(KindergartenError::Validation(format!("Невідома роль: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Admin {
    pub id: i64,
    /// Stored normalized, e.g. `+380501234567`
    pub phone_number: String,
    pub full_name: String,
    pub kindergarten_name: String,
    #[sqlx(try_from = "String")]
    pub role: AdminRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Admin {
    pub const TABLE: &'static str = "kindergarten_admins";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAdminRequest {
    pub phone_number: String,
    pub full_name: String,
    pub kindergarten_name: String,
    pub role: Option<AdminRole>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAdminRequest {
    pub phone_number: Option<String>,
    pub full_name: Option<String>,
    pub kindergarten_name: Option<String>,
    pub role: Option<AdminRole>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminFilter {
    #[serde(flatten)]
    pub list: ListParams,
    pub phone_number: Option<String>,
    pub full_name: Option<String>,
    pub kindergarten_name: Option<String>,
    pub role: Option<AdminRole>,
}

impl AdminFilter {
    pub fn has_filters(&self) -> bool {
        has_text(&self.phone_number)
            || has_text(&self.full_name)
            || has_text(&self.kindergarten_name)
            || self.role.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyEducatorRequest {
    #[serde(default)]
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducatorInfo {
    pub id: i64,
    pub phone_number: String,
    pub full_name: String,
    pub kindergarten_name: String,
}

impl From<Admin> for EducatorInfo {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id,
            phone_number: admin.phone_number,
            full_name: admin.full_name,
            kindergarten_name: admin.kindergarten_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducatorVerification {
    pub is_educator: bool,
    pub educator_info: Option<EducatorInfo>,
}
