//! Administrator and educator repository implementation

use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::filter::{fetch_page, ListQuery, ADMIN_SORT};
use crate::models::{Admin, AdminFilter, AdminRole, CreateAdminRequest, PageWindow, UpdateAdminRequest};
use crate::utils::errors::Result;

const SELECT_ADMINS: &str = "SELECT a.id, a.phone_number, a.full_name, a.kindergarten_name, a.role, \
     a.created_at, a.updated_at FROM kindergarten_admins a";

const RETURNING_ADMIN: &str =
    "RETURNING id, phone_number, full_name, kindergarten_name, role, created_at, updated_at";

/// Storage operations on admin accounts. Phone numbers are passed in normalized form.
#[async_trait]
pub trait AdminStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Admin>>;

    async fn find_by_phone(&self, phone_number: &str, exclude_id: Option<i64>) -> Result<Option<Admin>>;

    /// Account with this phone whose role is educator
    async fn find_educator_by_phone(&self, phone_number: &str) -> Result<Option<Admin>>;

    async fn list(&self, filter: &AdminFilter, window: PageWindow) -> Result<(Vec<Admin>, i64)>;

    async fn create(&self, request: &CreateAdminRequest) -> Result<Admin>;

    async fn update(&self, id: i64, request: &UpdateAdminRequest) -> Result<Admin>;

    async fn delete(&self, id: i64) -> Result<bool>;
}

#[derive(Debug, Clone)]
pub struct AdminRepository {
    pool: PgPool,
}

impl AdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn apply_filters(query: &mut ListQuery, filter: &AdminFilter) {
    query
        .ilike("a.phone_number", filter.phone_number.as_deref())
        .ilike("a.full_name", filter.full_name.as_deref())
        .ilike("a.kindergarten_name", filter.kindergarten_name.as_deref())
        .eq("a.role", filter.role.map(|r| r.as_str()));
}

#[async_trait]
impl AdminStore for AdminRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(&format!("{} WHERE a.id = $1", SELECT_ADMINS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(admin)
    }

    async fn find_by_phone(&self, phone_number: &str, exclude_id: Option<i64>) -> Result<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(&format!(
            "{} WHERE a.phone_number = $1 AND ($2::BIGINT IS NULL OR a.id <> $2)",
            SELECT_ADMINS
        ))
        .bind(phone_number)
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    async fn find_educator_by_phone(&self, phone_number: &str) -> Result<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(&format!(
            "{} WHERE a.phone_number = $1 AND a.role = $2",
            SELECT_ADMINS
        ))
        .bind(phone_number)
        .bind(AdminRole::Educator.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    async fn list(&self, filter: &AdminFilter, window: PageWindow) -> Result<(Vec<Admin>, i64)> {
        let mut count = ListQuery::new("SELECT COUNT(*) FROM kindergarten_admins a");
        let mut rows = ListQuery::new(SELECT_ADMINS);
        for query in [&mut count, &mut rows] {
            apply_filters(query, filter);
        }
        rows.order_by(&ADMIN_SORT, filter.list.sort_by.as_deref(), filter.list.sort_direction.as_deref())
            .paginate(window);

        fetch_page(&self.pool, Admin::TABLE, rows, count).await
    }

    async fn create(&self, request: &CreateAdminRequest) -> Result<Admin> {
        let admin = sqlx::query_as::<_, Admin>(&format!(
            r#"
            INSERT INTO kindergarten_admins (phone_number, full_name, kindergarten_name, role)
            VALUES ($1, $2, $3, $4)
            {}
            "#,
            RETURNING_ADMIN
        ))
        .bind(&request.phone_number)
        .bind(&request.full_name)
        .bind(&request.kindergarten_name)
        .bind(request.role.unwrap_or_default().as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(admin)
    }

    async fn update(&self, id: i64, request: &UpdateAdminRequest) -> Result<Admin> {
        let admin = sqlx::query_as::<_, Admin>(&format!(
            r#"
            UPDATE kindergarten_admins
            SET phone_number = COALESCE($2, phone_number),
                full_name = COALESCE($3, full_name),
                kindergarten_name = COALESCE($4, kindergarten_name),
                role = COALESCE($5, role),
                updated_at = NOW()
            WHERE id = $1
            {}
            "#,
            RETURNING_ADMIN
        ))
        .bind(id)
        .bind(request.phone_number.as_deref())
        .bind(request.full_name.as_deref())
        .bind(request.kindergarten_name.as_deref())
        .bind(request.role.map(|r| r.as_str()))
        .fetch_one(&self.pool)
        .await?;

        Ok(admin)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM kindergarten_admins WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
