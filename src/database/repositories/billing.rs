//! Parental billing repository implementation

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::database::filter::{fetch_page, ListQuery, BILLING_SORT};
use crate::models::{BillingChanges, BillingFilter, BillingRecord, NewBilling, PageWindow};
use crate::utils::errors::Result;

const SELECT_BILLING: &str = r#"
    SELECT b.id, b.parent_name, b.payment_month, b.current_debt, b.current_accrual,
           b.current_payment, b.balance, b.notes, b.created_at, b.updated_at
    FROM kindergarten_billing b"#;

const RETURNING_BILLING: &str = "RETURNING id, parent_name, payment_month, current_debt, current_accrual, \
     current_payment, balance, notes, created_at, updated_at";

#[async_trait]
pub trait BillingStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<BillingRecord>>;

    /// Record of this guardian for this month (first day), other than `exclude_id`
    async fn find_by_parent_and_month(
        &self,
        parent_name: &str,
        payment_month: NaiveDate,
        exclude_id: Option<i64>,
    ) -> Result<Option<BillingRecord>>;

    async fn list(&self, filter: &BillingFilter, window: PageWindow) -> Result<(Vec<BillingRecord>, i64)>;

    async fn create(&self, record: &NewBilling) -> Result<BillingRecord>;

    async fn update(&self, id: i64, changes: &BillingChanges) -> Result<BillingRecord>;

    async fn delete(&self, id: i64) -> Result<bool>;
}

#[derive(Debug, Clone)]
pub struct BillingRepository {
    pool: PgPool,
}

impl BillingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn apply_filters(query: &mut ListQuery, filter: &BillingFilter) {
    query
        .gte("b.payment_month", filter.payment_month_from)
        .lte("b.payment_month", filter.payment_month_to)
        .ilike("b.parent_name", filter.parent_name.as_deref())
        .gte("b.balance", filter.balance_min)
        .lte("b.balance", filter.balance_max);
}

#[async_trait]
impl BillingStore for BillingRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<BillingRecord>> {
        let record = sqlx::query_as::<_, BillingRecord>(&format!("{} WHERE b.id = $1", SELECT_BILLING))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    async fn find_by_parent_and_month(
        &self,
        parent_name: &str,
        payment_month: NaiveDate,
        exclude_id: Option<i64>,
    ) -> Result<Option<BillingRecord>> {
        let record = sqlx::query_as::<_, BillingRecord>(&format!(
            "{} WHERE b.parent_name = $1 AND b.payment_month = $2 AND ($3::BIGINT IS NULL OR b.id <> $3) LIMIT 1",
            SELECT_BILLING
        ))
        .bind(parent_name)
        .bind(payment_month)
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list(&self, filter: &BillingFilter, window: PageWindow) -> Result<(Vec<BillingRecord>, i64)> {
        let mut count = ListQuery::new("SELECT COUNT(*) FROM kindergarten_billing b");
        let mut rows = ListQuery::new(SELECT_BILLING);
        for query in [&mut count, &mut rows] {
            apply_filters(query, filter);
        }
        rows.order_by(&BILLING_SORT, filter.list.sort_by.as_deref(), filter.list.sort_direction.as_deref())
            .paginate(window);

        fetch_page(&self.pool, BillingRecord::TABLE, rows, count).await
    }

    async fn create(&self, record: &NewBilling) -> Result<BillingRecord> {
        let created = sqlx::query_as::<_, BillingRecord>(&format!(
            r#"
            INSERT INTO kindergarten_billing
                (parent_name, payment_month, current_debt, current_accrual, current_payment, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            {}
            "#,
            RETURNING_BILLING
        ))
        .bind(&record.parent_name)
        .bind(record.payment_month)
        .bind(record.current_debt)
        .bind(record.current_accrual)
        .bind(record.current_payment)
        .bind(record.notes.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update(&self, id: i64, changes: &BillingChanges) -> Result<BillingRecord> {
        let updated = sqlx::query_as::<_, BillingRecord>(&format!(
            r#"
            UPDATE kindergarten_billing
            SET parent_name = COALESCE($2, parent_name),
                payment_month = COALESCE($3, payment_month),
                current_debt = COALESCE($4, current_debt),
                current_accrual = COALESCE($5, current_accrual),
                current_payment = COALESCE($6, current_payment),
                notes = COALESCE($7, notes),
                updated_at = NOW()
            WHERE id = $1
            {}
            "#,
            RETURNING_BILLING
        ))
        .bind(id)
        .bind(changes.parent_name.as_deref())
        .bind(changes.payment_month)
        .bind(changes.current_debt)
        .bind(changes.current_accrual)
        .bind(changes.current_payment)
        .bind(changes.notes.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM kindergarten_billing WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
