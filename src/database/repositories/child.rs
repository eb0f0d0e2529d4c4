//! Children roster repository implementation

use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::filter::{fetch_page, ListQuery, CHILD_SORT};
use crate::models::{Child, ChildChanges, ChildFilter, NewChild, PageWindow};
use crate::utils::errors::Result;

const SELECT_CHILDREN: &str = r#"
    SELECT c.id, c.child_name, c.parent_name, c.phone_number, c.group_id, c.created_at,
           g.group_name, g.kindergarten_name
    FROM children_roster c
    LEFT JOIN kindergarten_groups g ON g.id = c.group_id"#;

/// Storage operations on the children roster
#[async_trait]
pub trait ChildStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Child>>;

    /// Child with the same name and guardian in the same kindergarten, other than `exclude_id`
    async fn find_duplicate(
        &self,
        child_name: &str,
        parent_name: &str,
        kindergarten_name: &str,
        exclude_id: Option<i64>,
    ) -> Result<Option<Child>>;

    async fn list(&self, filter: &ChildFilter, window: PageWindow) -> Result<(Vec<Child>, i64)>;

    async fn create(&self, child: &NewChild) -> Result<Child>;

    async fn update(&self, id: i64, changes: &ChildChanges) -> Result<Child>;

    async fn delete(&self, id: i64) -> Result<bool>;
}

#[derive(Debug, Clone)]
pub struct ChildRepository {
    pool: PgPool,
}

impl ChildRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn apply_filters(query: &mut ListQuery, filter: &ChildFilter) {
    query
        .ilike("c.child_name", filter.child_name.as_deref())
        .ilike("c.parent_name", filter.parent_name.as_deref())
        .ilike("c.phone_number", filter.phone_number.as_deref())
        .eq("c.group_id", filter.group_id)
        .ilike("g.kindergarten_name", filter.kindergarten_name.as_deref());
}

#[async_trait]
impl ChildStore for ChildRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Child>> {
        let child = sqlx::query_as::<_, Child>(&format!("{} WHERE c.id = $1", SELECT_CHILDREN))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(child)
    }

    async fn find_duplicate(
        &self,
        child_name: &str,
        parent_name: &str,
        kindergarten_name: &str,
        exclude_id: Option<i64>,
    ) -> Result<Option<Child>> {
        let child = sqlx::query_as::<_, Child>(&format!(
            r#"{}
            WHERE c.child_name = $1
              AND c.parent_name = $2
              AND g.kindergarten_name = $3
              AND ($4::BIGINT IS NULL OR c.id <> $4)
            LIMIT 1"#,
            SELECT_CHILDREN
        ))
        .bind(child_name)
        .bind(parent_name)
        .bind(kindergarten_name)
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(child)
    }

    async fn list(&self, filter: &ChildFilter, window: PageWindow) -> Result<(Vec<Child>, i64)> {
        let mut count = ListQuery::new(
            "SELECT COUNT(*) FROM children_roster c LEFT JOIN kindergarten_groups g ON g.id = c.group_id",
        );
        let mut rows = ListQuery::new(SELECT_CHILDREN);
        for query in [&mut count, &mut rows] {
            apply_filters(query, filter);
        }
        rows.order_by(&CHILD_SORT, filter.list.sort_by.as_deref(), filter.list.sort_direction.as_deref())
            .paginate(window);

        fetch_page(&self.pool, Child::TABLE, rows, count).await
    }

    async fn create(&self, child: &NewChild) -> Result<Child> {
        let created = sqlx::query_as::<_, Child>(
            r#"
            WITH inserted AS (
                INSERT INTO children_roster (child_name, parent_name, phone_number, group_id)
                VALUES ($1, $2, $3, $4)
                RETURNING *
            )
            SELECT c.id, c.child_name, c.parent_name, c.phone_number, c.group_id, c.created_at,
                   g.group_name, g.kindergarten_name
            FROM inserted c
            LEFT JOIN kindergarten_groups g ON g.id = c.group_id
            "#
        )
        .bind(&child.child_name)
        .bind(&child.parent_name)
        .bind(child.phone_number.as_deref())
        .bind(child.group_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update(&self, id: i64, changes: &ChildChanges) -> Result<Child> {
        let updated = sqlx::query_as::<_, Child>(
            r#"
            WITH updated AS (
                UPDATE children_roster
                SET child_name = COALESCE($2, child_name),
                    parent_name = COALESCE($3, parent_name),
                    phone_number = COALESCE($4, phone_number),
                    group_id = COALESCE($5, group_id)
                WHERE id = $1
                RETURNING *
            )
            SELECT c.id, c.child_name, c.parent_name, c.phone_number, c.group_id, c.created_at,
                   g.group_name, g.kindergarten_name
            FROM updated c
            LEFT JOIN kindergarten_groups g ON g.id = c.group_id
            "#
        )
        .bind(id)
        .bind(changes.child_name.as_deref())
        .bind(changes.parent_name.as_deref())
        .bind(changes.phone_number.as_deref())
        .bind(changes.group_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM children_roster WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
