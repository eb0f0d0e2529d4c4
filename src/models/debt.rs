//! Debtor model
//!
//! Read-only view of outstanding debts, loaded from outside the back office.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::common::{has_text, ListParams};

/// One outstanding debt for a child
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Debt {
    pub id: i64,
    pub child_name: String,
    pub debt_amount: f64,
    pub group_number: Option<String>,
    pub kindergarten_name: Option<String>,
}

impl Debt {
    pub const TABLE: &'static str = "debtor_debts";
}

/// A debtor with every debt recorded against them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debtor {
    pub id: i64,
    pub debts: Vec<Debt>,
}

impl Debtor {
    pub const TABLE: &'static str = "debtors";

    pub fn total_debt(&self) -> f64 {
        self.debts.iter().map(|d| d.debt_amount).sum()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebtFilter {
    #[serde(flatten)]
    pub list: ListParams,
    pub child_name: Option<String>,
    pub group_number: Option<String>,
    pub kindergarten_name: Option<String>,
}

impl DebtFilter {
    pub fn has_filters(&self) -> bool {
        has_text(&self.child_name) || has_text(&self.group_number) || has_text(&self.kindergarten_name)
    }
}
