//! Group repository implementation

use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::filter::{fetch_page, ListQuery, GROUP_SORT};
use crate::models::{CreateGroupRequest, Group, GroupFilter, PageWindow, UpdateGroupRequest};
use crate::utils::errors::Result;

const SELECT_GROUPS: &str =
    "SELECT g.id, g.kindergarten_name, g.group_name, g.group_type, g.created_at FROM kindergarten_groups g";

/// Storage operations on kindergarten groups
#[async_trait]
pub trait GroupStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Group>>;

    /// Group with this name in this kindergarten, other than `exclude_id`
    async fn find_by_name(
        &self,
        kindergarten_name: &str,
        group_name: &str,
        exclude_id: Option<i64>,
    ) -> Result<Option<Group>>;

    async fn list(&self, filter: &GroupFilter, window: PageWindow) -> Result<(Vec<Group>, i64)>;

    async fn create(&self, request: &CreateGroupRequest) -> Result<Group>;

    async fn update(&self, id: i64, request: &UpdateGroupRequest) -> Result<Group>;

    /// Returns false when no row had this id
    async fn delete(&self, id: i64) -> Result<bool>;
}

#[derive(Debug, Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn apply_filters(query: &mut ListQuery, filter: &GroupFilter) {
    query
        .ilike("g.kindergarten_name", filter.kindergarten_name.as_deref())
        .ilike("g.group_name", filter.group_name.as_deref())
        .eq("g.group_type", filter.group_type.map(|t| t.as_str()));
}

#[async_trait]
impl GroupStore for GroupRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Group>> {
        let group = sqlx::query_as::<_, Group>(&format!("{} WHERE g.id = $1", SELECT_GROUPS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(group)
    }

    async fn find_by_name(
        &self,
        kindergarten_name: &str,
        group_name: &str,
        exclude_id: Option<i64>,
    ) -> Result<Option<Group>> {
        let group = sqlx::query_as::<_, Group>(&format!(
            "{} WHERE g.kindergarten_name = $1 AND g.group_name = $2 AND ($3::BIGINT IS NULL OR g.id <> $3) LIMIT 1",
            SELECT_GROUPS
        ))
        .bind(kindergarten_name)
        .bind(group_name)
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    async fn list(&self, filter: &GroupFilter, window: PageWindow) -> Result<(Vec<Group>, i64)> {
        let mut count = ListQuery::new("SELECT COUNT(*) FROM kindergarten_groups g");
        let mut rows = ListQuery::new(SELECT_GROUPS);
        for query in [&mut count, &mut rows] {
            apply_filters(query, filter);
        }
        rows.order_by(&GROUP_SORT, filter.list.sort_by.as_deref(), filter.list.sort_direction.as_deref())
            .paginate(window);

        fetch_page(&self.pool, Group::TABLE, rows, count).await
    }

    async fn create(&self, request: &CreateGroupRequest) -> Result<Group> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            INSERT INTO kindergarten_groups (kindergarten_name, group_name, group_type)
            VALUES ($1, $2, $3)
            RETURNING id, kindergarten_name, group_name, group_type, created_at
            "#
        )
        .bind(&request.kindergarten_name)
        .bind(&request.group_name)
        .bind(request.group_type.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(group)
    }

    async fn update(&self, id: i64, request: &UpdateGroupRequest) -> Result<Group> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            UPDATE kindergarten_groups
            SET kindergarten_name = COALESCE($2, kindergarten_name),
                group_name = COALESCE($3, group_name),
                group_type = COALESCE($4, group_type)
            WHERE id = $1
            RETURNING id, kindergarten_name, group_name, group_type, created_at
            "#
        )
        .bind(id)
        .bind(request.kindergarten_name.as_deref())
        .bind(request.group_name.as_deref())
        .bind(request.group_type.map(|t| t.as_str()))
        .fetch_one(&self.pool)
        .await?;

        Ok(group)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM kindergarten_groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
