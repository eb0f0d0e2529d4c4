//! Filtered listing queries
//!
//! Listings are built with [`sqlx::QueryBuilder`]: every filter value is a
//! bound parameter and sort columns come from a fixed allow-list, so nothing
//! from the request is ever spliced into SQL text.

use std::time::Instant;

use sqlx::postgres::PgRow;
use sqlx::{Encode, FromRow, PgPool, Postgres, QueryBuilder, Type};

use crate::models::PageWindow;
use crate::utils::errors::Result;
use crate::utils::logging::log_database_operation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse `asc`/`desc` case-insensitively, anything else gives `default`
    pub fn parse(raw: Option<&str>, default: SortDirection) -> Self {
        match raw.map(|r| r.trim().to_ascii_lowercase()).as_deref() {
            Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            _ => default,
        }
    }

    fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Sort allow-list of one listing: request field name to SQL expression
#[derive(Debug)]
pub struct SortSpec {
    pub columns: &'static [(&'static str, &'static str)],
    pub default_field: &'static str,
    pub default_direction: SortDirection,
    /// Appended after the chosen column so pages are stable
    pub tiebreak: &'static str,
}

impl SortSpec {
    /// Resolve the requested sort, falling back to the defaults for unknown values
    pub fn resolve(&self, sort_by: Option<&str>, direction: Option<&str>) -> (&'static str, SortDirection) {
        let lookup = |field: &str| {
            self.columns
                .iter()
                .find(|(name, _)| *name == field)
                .map(|(_, column)| *column)
        };

        let column = sort_by
            .and_then(|field| lookup(field.trim()))
            .or_else(|| lookup(self.default_field))
            .unwrap_or(self.tiebreak);

        (column, SortDirection::parse(direction, self.default_direction))
    }
}

pub const GROUP_SORT: SortSpec = SortSpec {
    columns: &[
        ("id", "g.id"),
        ("kindergarten_name", "g.kindergarten_name"),
        ("group_name", "g.group_name"),
        ("group_type", "g.group_type"),
        ("created_at", "g.created_at"),
    ],
    default_field: "id",
    default_direction: SortDirection::Desc,
    tiebreak: "g.id",
};

pub const CHILD_SORT: SortSpec = SortSpec {
    columns: &[
        ("id", "c.id"),
        ("child_name", "c.child_name"),
        ("parent_name", "c.parent_name"),
        ("phone_number", "c.phone_number"),
        ("created_at", "c.created_at"),
        ("group_name", "g.group_name"),
    ],
    default_field: "child_name",
    default_direction: SortDirection::Asc,
    tiebreak: "c.id",
};

pub const ATTENDANCE_SHEET_SORT: SortSpec = SortSpec {
    columns: &[
        ("child_name", "c.child_name"),
        ("group_name", "g.group_name"),
    ],
    default_field: "child_name",
    default_direction: SortDirection::Asc,
    tiebreak: "c.id",
};

pub const FOOD_COST_SORT: SortSpec = SortSpec {
    columns: &[
        ("id", "f.id"),
        ("date", "f.date"),
        ("young_group_cost", "f.young_group_cost"),
        ("older_group_cost", "f.older_group_cost"),
        ("created_at", "f.created_at"),
    ],
    default_field: "date",
    default_direction: SortDirection::Desc,
    tiebreak: "f.id",
};

pub const BILLING_SORT: SortSpec = SortSpec {
    columns: &[
        ("id", "b.id"),
        ("parent_name", "b.parent_name"),
        ("payment_month", "b.payment_month"),
        ("current_debt", "b.current_debt"),
        ("current_accrual", "b.current_accrual"),
        ("current_payment", "b.current_payment"),
        ("balance", "b.balance"),
        ("created_at", "b.created_at"),
    ],
    default_field: "payment_month",
    default_direction: SortDirection::Desc,
    tiebreak: "b.id",
};

pub const ADMIN_SORT: SortSpec = SortSpec {
    columns: &[
        ("id", "a.id"),
        ("phone_number", "a.phone_number"),
        ("full_name", "a.full_name"),
        ("kindergarten_name", "a.kindergarten_name"),
        ("role", "a.role"),
        ("created_at", "a.created_at"),
    ],
    default_field: "id",
    default_direction: SortDirection::Desc,
    tiebreak: "a.id",
};

pub const DEBT_SORT: SortSpec = SortSpec {
    columns: &[
        ("id", "d.id"),
        ("child_name", "d.child_name"),
        ("debt_amount", "d.debt_amount"),
        ("group_number", "d.group_number"),
        ("kindergarten_name", "d.kindergarten_name"),
    ],
    default_field: "id",
    default_direction: SortDirection::Desc,
    tiebreak: "d.id",
};

/// A SELECT with an accumulating WHERE clause
pub struct ListQuery {
    builder: QueryBuilder<'static, Postgres>,
    has_where: bool,
}

impl ListQuery {
    pub fn new(select: &str) -> Self {
        Self {
            builder: QueryBuilder::new(select),
            has_where: false,
        }
    }

    /// Raw SQL, only ever called with fixed text
    pub fn push(&mut self, sql: &str) -> &mut Self {
        self.builder.push(sql);
        self
    }

    pub fn bind<T>(&mut self, value: T) -> &mut Self
    where
        T: 'static + Encode<'static, Postgres> + Type<Postgres> + Send,
    {
        self.builder.push_bind(value);
        self
    }

    fn next_condition(&mut self) {
        self.builder.push(if self.has_where { " AND " } else { " WHERE " });
        self.has_where = true;
    }

    /// Case-insensitive substring match; blank values are ignored
    pub fn ilike(&mut self, column: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.next_condition();
            self.builder
                .push(column)
                .push(" ILIKE ")
                .push_bind(format!("%{}%", escape_like(value)));
        }
        self
    }

    pub fn eq<T>(&mut self, column: &str, value: Option<T>) -> &mut Self
    where
        T: 'static + Encode<'static, Postgres> + Type<Postgres> + Send,
    {
        self.compare(column, " = ", value)
    }

    pub fn gte<T>(&mut self, column: &str, value: Option<T>) -> &mut Self
    where
        T: 'static + Encode<'static, Postgres> + Type<Postgres> + Send,
    {
        self.compare(column, " >= ", value)
    }

    pub fn lte<T>(&mut self, column: &str, value: Option<T>) -> &mut Self
    where
        T: 'static + Encode<'static, Postgres> + Type<Postgres> + Send,
    {
        self.compare(column, " <= ", value)
    }

    fn compare<T>(&mut self, column: &str, operator: &str, value: Option<T>) -> &mut Self
    where
        T: 'static + Encode<'static, Postgres> + Type<Postgres> + Send,
    {
        if let Some(value) = value {
            self.next_condition();
            self.builder.push(column).push(operator).push_bind(value);
        }
        self
    }

    /// ORDER BY an allow-listed column, then the tiebreak column
    pub fn order_by(&mut self, spec: &SortSpec, sort_by: Option<&str>, direction: Option<&str>) -> &mut Self {
        let (column, direction) = spec.resolve(sort_by, direction);
        self.builder
            .push(" ORDER BY ")
            .push(column)
            .push(" ")
            .push(direction.as_sql());
        if column != spec.tiebreak {
            self.builder.push(", ").push(spec.tiebreak);
        }
        self
    }

    pub fn paginate(&mut self, window: PageWindow) -> &mut Self {
        self.builder
            .push(" LIMIT ")
            .push_bind(window.limit)
            .push(" OFFSET ")
            .push_bind(window.offset);
        self
    }

    pub fn sql(&self) -> &str {
        self.builder.sql()
    }

    pub fn into_builder(self) -> QueryBuilder<'static, Postgres> {
        self.builder
    }
}

/// Run a listing and its COUNT twin, returning the page and the full total
pub async fn fetch_page<T>(pool: &PgPool, table: &str, rows: ListQuery, count: ListQuery) -> Result<(Vec<T>, i64)>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let started = Instant::now();
    let mut rows = rows.into_builder();
    let mut count = count.into_builder();

    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;
    let items = rows.build_query_as::<T>().fetch_all(pool).await?;

    log_database_operation("list", table, started.elapsed().as_millis() as u64, true);
    Ok((items, total))
}

/// Escape LIKE wildcards so user input only matches literally
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
