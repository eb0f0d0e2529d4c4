//! Debtor repository implementation

use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::filter::{fetch_page, ListQuery, DEBT_SORT};
use crate::models::{Debt, DebtFilter, Debtor, PageWindow};
use crate::utils::errors::Result;

const SELECT_DEBTS: &str =
    "SELECT d.id, d.child_name, d.debt_amount, d.group_number, d.kindergarten_name FROM debtor_debts d";

/// Read access to debtors and their debts
#[async_trait]
pub trait DebtStore: Send + Sync {
    async fn list(&self, filter: &DebtFilter, window: PageWindow) -> Result<(Vec<Debt>, i64)>;

    /// The debtor with all of their debts, oldest first
    async fn find_debtor(&self, id: i64) -> Result<Option<Debtor>>;
}

#[derive(Debug, Clone)]
pub struct DebtRepository {
    pool: PgPool,
}

impl DebtRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn apply_filters(query: &mut ListQuery, filter: &DebtFilter) {
    query
        .ilike("d.child_name", filter.child_name.as_deref())
        .ilike("d.kindergarten_name", filter.kindergarten_name.as_deref())
        .eq(
            "d.group_number",
            filter
                .group_number
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
        );
}

#[async_trait]
impl DebtStore for DebtRepository {
    async fn list(&self, filter: &DebtFilter, window: PageWindow) -> Result<(Vec<Debt>, i64)> {
        let mut count = ListQuery::new("SELECT COUNT(*) FROM debtor_debts d");
        let mut rows = ListQuery::new(SELECT_DEBTS);
        for query in [&mut count, &mut rows] {
            apply_filters(query, filter);
        }
        rows.order_by(&DEBT_SORT, filter.list.sort_by.as_deref(), filter.list.sort_direction.as_deref())
            .paginate(window);

        fetch_page(&self.pool, Debt::TABLE, rows, count).await
    }

    async fn find_debtor(&self, id: i64) -> Result<Option<Debtor>> {
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM debtors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        if exists.is_none() {
            return Ok(None);
        }

        let debts = sqlx::query_as::<_, Debt>(&format!("{} WHERE d.debtor_id = $1 ORDER BY d.id", SELECT_DEBTS))
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        Ok(Some(Debtor { id, debts }))
    }
}
