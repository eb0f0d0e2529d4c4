//! Daily food cost repository implementation

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::database::filter::{fetch_page, ListQuery, FOOD_COST_SORT};
use crate::models::{CreateFoodCostRequest, DailyFoodCost, FoodCostFilter, PageWindow, UpdateFoodCostRequest};
use crate::utils::errors::Result;

const SELECT_FOOD_COSTS: &str =
    "SELECT f.id, f.date, f.young_group_cost, f.older_group_cost, f.created_at FROM daily_food_cost f";

#[async_trait]
pub trait FoodCostStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<DailyFoodCost>>;

    async fn find_by_date(&self, date: NaiveDate, exclude_id: Option<i64>) -> Result<Option<DailyFoodCost>>;

    async fn list(&self, filter: &FoodCostFilter, window: PageWindow) -> Result<(Vec<DailyFoodCost>, i64)>;

    async fn create(&self, request: &CreateFoodCostRequest) -> Result<DailyFoodCost>;

    async fn update(&self, id: i64, request: &UpdateFoodCostRequest) -> Result<DailyFoodCost>;

    async fn delete(&self, id: i64) -> Result<bool>;
}

#[derive(Debug, Clone)]
pub struct FoodCostRepository {
    pool: PgPool,
}

impl FoodCostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn apply_filters(query: &mut ListQuery, filter: &FoodCostFilter) {
    query
        .gte("f.date", filter.date_from)
        .lte("f.date", filter.date_to);
}

#[async_trait]
impl FoodCostStore for FoodCostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<DailyFoodCost>> {
        let cost = sqlx::query_as::<_, DailyFoodCost>(&format!("{} WHERE f.id = $1", SELECT_FOOD_COSTS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(cost)
    }

    async fn find_by_date(&self, date: NaiveDate, exclude_id: Option<i64>) -> Result<Option<DailyFoodCost>> {
        let cost = sqlx::query_as::<_, DailyFoodCost>(&format!(
            "{} WHERE f.date = $1 AND ($2::BIGINT IS NULL OR f.id <> $2)",
            SELECT_FOOD_COSTS
        ))
        .bind(date)
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cost)
    }

    async fn list(&self, filter: &FoodCostFilter, window: PageWindow) -> Result<(Vec<DailyFoodCost>, i64)> {
        let mut count = ListQuery::new("SELECT COUNT(*) FROM daily_food_cost f");
        let mut rows = ListQuery::new(SELECT_FOOD_COSTS);
        for query in [&mut count, &mut rows] {
            apply_filters(query, filter);
        }
        rows.order_by(&FOOD_COST_SORT, filter.list.sort_by.as_deref(), filter.list.sort_direction.as_deref())
            .paginate(window);

        fetch_page(&self.pool, DailyFoodCost::TABLE, rows, count).await
    }

    async fn create(&self, request: &CreateFoodCostRequest) -> Result<DailyFoodCost> {
        let cost = sqlx::query_as::<_, DailyFoodCost>(
            r#"
            INSERT INTO daily_food_cost (date, young_group_cost, older_group_cost)
            VALUES ($1, $2, $3)
            RETURNING id, date, young_group_cost, older_group_cost, created_at
            "#
        )
        .bind(request.date)
        .bind(request.young_group_cost)
        .bind(request.older_group_cost)
        .fetch_one(&self.pool)
        .await?;

        Ok(cost)
    }

    async fn update(&self, id: i64, request: &UpdateFoodCostRequest) -> Result<DailyFoodCost> {
        let cost = sqlx::query_as::<_, DailyFoodCost>(
            r#"
            UPDATE daily_food_cost
            SET date = COALESCE($2, date),
                young_group_cost = COALESCE($3, young_group_cost),
                older_group_cost = COALESCE($4, older_group_cost)
            WHERE id = $1
            RETURNING id, date, young_group_cost, older_group_cost, created_at
            "#
        )
        .bind(id)
        .bind(request.date)
        .bind(request.young_group_cost)
        .bind(request.older_group_cost)
        .fetch_one(&self.pool)
        .await?;

        Ok(cost)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM daily_food_cost WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
