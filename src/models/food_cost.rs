//! Daily food cost model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::common::ListParams;

/// Per-child meal cost for one day, split by age band
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyFoodCost {
    pub id: i64,
    pub date: NaiveDate,
    pub young_group_cost: f64,
    pub older_group_cost: f64,
    pub created_at: DateTime<Utc>,
}

impl DailyFoodCost {
    pub const TABLE: &'static str = "daily_food_cost";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFoodCostRequest {
    pub date: NaiveDate,
    pub young_group_cost: f64,
    pub older_group_cost: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFoodCostRequest {
    pub date: Option<NaiveDate>,
    pub young_group_cost: Option<f64>,
    pub older_group_cost: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodCostFilter {
    #[serde(flatten)]
    pub list: ListParams,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl FoodCostFilter {
    pub fn has_filters(&self) -> bool {
        self.date_from.is_some() || self.date_to.is_some()
    }
}
