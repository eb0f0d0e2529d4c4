//! Parental billing model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::common::{has_text, ListParams};

/// Monthly billing line for a guardian.
///
/// `balance` is computed by the database as debt + accrual - payment, so a
/// positive value is owed and a negative one is an overpayment.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BillingRecord {
    pub id: i64,
    pub parent_name: String,
    pub payment_month: NaiveDate,
    pub current_debt: f64,
    pub current_accrual: f64,
    pub current_payment: f64,
    pub balance: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BillingRecord {
    pub const TABLE: &'static str = "kindergarten_billing";
}

/// Balance as the database computes it
pub fn billing_balance(debt: f64, accrual: f64, payment: f64) -> f64 {
    debt + accrual - payment
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBillingRequest {
    pub parent_name: String,
    /// `YYYY-MM` or `YYYY-MM-DD`
    pub payment_month: String,
    pub current_debt: Option<f64>,
    pub current_accrual: Option<f64>,
    pub current_payment: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBillingRequest {
    pub parent_name: Option<String>,
    pub payment_month: Option<String>,
    pub current_debt: Option<f64>,
    pub current_accrual: Option<f64>,
    pub current_payment: Option<f64>,
    pub notes: Option<String>,
}

impl UpdateBillingRequest {
    pub fn is_empty(&self) -> bool {
        self.parent_name.is_none()
            && self.payment_month.is_none()
            && self.current_debt.is_none()
            && self.current_accrual.is_none()
            && self.current_payment.is_none()
            && self.notes.is_none()
    }
}

/// Validated insert, month already normalized to its first day
#[derive(Debug, Clone)]
pub struct NewBilling {
    pub parent_name: String,
    pub payment_month: NaiveDate,
    pub current_debt: f64,
    pub current_accrual: f64,
    pub current_payment: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BillingChanges {
    pub parent_name: Option<String>,
    pub payment_month: Option<NaiveDate>,
    pub current_debt: Option<f64>,
    pub current_accrual: Option<f64>,
    pub current_payment: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillingFilter {
    #[serde(flatten)]
    pub list: ListParams,
    pub payment_month_from: Option<NaiveDate>,
    pub payment_month_to: Option<NaiveDate>,
    pub parent_name: Option<String>,
    pub balance_min: Option<f64>,
    pub balance_max: Option<f64>,
}

impl BillingFilter {
    pub fn has_filters(&self) -> bool {
        self.payment_month_from.is_some()
            || self.payment_month_to.is_some()
            || has_text(&self.parent_name)
            || self.balance_min.is_some()
            || self.balance_max.is_some()
    }
}
