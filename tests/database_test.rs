//! PostgreSQL-backed tests
//!
//! Run only when `TEST_DATABASE_URL` points at a disposable database; every
//! test truncates the tables first, so they run serially.

mod helpers;

use assert_matches::assert_matches;
use serial_test::serial;
use sqlx::PgPool;

use helpers::{actor, monday, test_settings, KINDERGARTEN};
use kindergarten_office::database::{run_migrations, DatabaseService};
use kindergarten_office::models::*;
use kindergarten_office::utils::errors::KindergartenError;
use kindergarten_office::ServiceFactory;

async fn test_pool() -> Option<PgPool> {
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("TEST_DATABASE_URL not set, skipping database test");
            return None;
        }
    };

    let pool = PgPool::connect(&url).await.expect("Failed to connect to test database");
    run_migrations(&pool).await.expect("Failed to run migrations");
    sqlx::query(
        "TRUNCATE attendance, children_roster, kindergarten_groups, daily_food_cost, \
         kindergarten_billing, kindergarten_admins, debtor_debts, debtors, audit_log RESTART IDENTITY CASCADE",
    )
    .execute(&pool)
    .await
    .expect("Failed to clean tables");

    Some(pool)
}

fn services(pool: PgPool) -> ServiceFactory {
    ServiceFactory::new(DatabaseService::new(pool), &test_settings())
}

async fn create_group(services: &ServiceFactory, name: &str) -> Group {
    services
        .group_service
        .create(
            CreateGroupRequest {
                kindergarten_name: KINDERGARTEN.to_string(),
                group_name: name.to_string(),
                group_type: GroupType::Young,
            },
            &actor(),
        )
        .await
        .unwrap()
}

async fn create_child(services: &ServiceFactory, group_id: i64, name: &str) -> Child {
    services
        .child_service
        .create(
            CreateChildRequest {
                child_name: name.to_string(),
                parent_name: format!("Батьки {}", name),
                phone_number: Some("050 123 45 67".to_string()),
                group_id,
                kindergarten_name: None,
            },
            &actor(),
        )
        .await
        .unwrap()
}

#[tokio::test]
#[serial]
async fn test_group_crud_and_filtering() {
    let Some(pool) = test_pool().await else { return };
    let services = services(pool.clone());

    let bees = create_group(&services, "Бджілки").await;
    create_group(&services, "Зайчики").await;

    let page = services
        .group_service
        .list(
            &GroupFilter {
                group_name: Some("бдж".to_string()),
                ..Default::default()
            },
            &actor(),
        )
        .await
        .unwrap();
    assert_eq!(page.total_items, 1);
    assert_eq!(page.items[0].id, bees.id);

    let renamed = services
        .group_service
        .update(
            bees.id,
            UpdateGroupRequest {
                group_type: Some(GroupType::Senior),
                ..Default::default()
            },
            &actor(),
        )
        .await
        .unwrap();
    assert_eq!(renamed.group_type, GroupType::Senior);
    assert_eq!(renamed.group_name, "Бджілки");

    services.group_service.delete(bees.id, &actor()).await.unwrap();
    assert_matches!(
        services.group_service.get(bees.id).await,
        Err(KindergartenError::NotFound(_))
    );

    let audited: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audit_log")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(audited, 5);
}

#[tokio::test]
#[serial]
async fn test_child_rows_carry_group_names() {
    let Some(pool) = test_pool().await else { return };
    let services = services(pool);

    let group = create_group(&services, "Сонячні зайчики").await;
    let child = create_child(&services, group.id, "Марія").await;

    assert_eq!(child.group_name.as_deref(), Some("Сонячні зайчики"));
    assert_eq!(child.kindergarten_name.as_deref(), Some(KINDERGARTEN));
    assert_eq!(child.phone_number.as_deref(), Some("050 123 45 67"));

    let fetched = services.child_service.get(child.id).await.unwrap();
    assert_eq!(fetched.group_id, Some(group.id));
}

#[tokio::test]
#[serial]
async fn test_attendance_sheet_and_mobile_flow() {
    let Some(pool) = test_pool().await else { return };
    let services = services(pool);

    let group = create_group(&services, "Бджілки").await;
    let anna = create_child(&services, group.id, "Анна").await;
    let bohdan = create_child(&services, group.id, "Богдан").await;
    create_group(&services, "Порожня").await;

    let summary = services
        .reconciliation_service
        .apply(
            MobileAttendanceRequest {
                date: helpers::MONDAY_TS,
                children: Some(vec![anna.id]),
                groups: None,
            }
            .into_batch()
            .unwrap(),
            &actor(),
        )
        .await;
    assert_eq!(summary.success, 1);

    let sheet = services
        .attendance_service
        .list_sheet(
            &AttendanceSheetFilter {
                date: Some(monday()),
                ..Default::default()
            },
            &actor(),
        )
        .await
        .unwrap();
    assert_eq!(sheet.total_items, 2);
    assert_eq!(sheet.items[0].child_id, anna.id);
    assert_eq!(sheet.items[0].attendance_status, AttendanceStatus::Present);
    assert_eq!(sheet.items[1].child_id, bohdan.id);
    assert_eq!(sheet.items[1].attendance_status, AttendanceStatus::Absent);
    assert!(sheet.items[1].attendance_id.is_none());

    let view = services
        .attendance_service
        .mobile_view(helpers::MONDAY_TS, &actor())
        .await
        .unwrap();
    assert_eq!(view.groups.len(), 1);
    assert_eq!(view.groups[0].group.len(), 2);
    assert!(view.groups[0].group[0].selected);
    assert!(!view.groups[0].group[1].selected);
}

#[tokio::test]
#[serial]
async fn test_unique_index_maps_to_conflict() {
    let Some(pool) = test_pool().await else { return };
    let database = DatabaseService::new(pool);

    let request = CreateFoodCostRequest {
        date: monday(),
        young_group_cost: 70.0,
        older_group_cost: 85.0,
    };
    database.food_costs.create(&request).await.unwrap();

    let raw = database.food_costs.create(&request).await.unwrap_err();
    assert_matches!(raw.or_conflict("exists"), KindergartenError::Conflict(message) => {
        assert_eq!(message, "exists");
    });
}

#[tokio::test]
#[serial]
async fn test_billing_balance_is_generated() {
    let Some(pool) = test_pool().await else { return };
    let services = services(pool);

    let record = services
        .billing_service
        .create(
            CreateBillingRequest {
                parent_name: "Олена Коваленко".to_string(),
                payment_month: "2025-03".to_string(),
                current_debt: Some(200.0),
                current_accrual: Some(1800.0),
                current_payment: Some(1500.0),
                notes: None,
            },
            &actor(),
        )
        .await
        .unwrap();
    assert_eq!(record.balance, 500.0);

    let updated = services
        .billing_service
        .update(
            record.id,
            UpdateBillingRequest {
                current_payment: Some(2000.0),
                ..Default::default()
            },
            &actor(),
        )
        .await
        .unwrap();
    assert_eq!(updated.balance, 0.0);
}

#[tokio::test]
#[serial]
async fn test_debtor_with_debts() {
    let Some(pool) = test_pool().await else { return };

    let debtor: i64 = sqlx::query_scalar("INSERT INTO debtors DEFAULT VALUES RETURNING id")
        .fetch_one(&pool)
        .await
        .unwrap();
    for (child, amount, group) in [("Марія", 120.0_f64, "2"), ("Назар", 80.0, "5")] {
        sqlx::query(
            "INSERT INTO debtor_debts (debtor_id, child_name, debt_amount, group_number, kindergarten_name) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(debtor)
        .bind(child)
        .bind(amount)
        .bind(group)
        .bind(KINDERGARTEN)
        .execute(&pool)
        .await
        .unwrap();
    }
    let services = services(pool);

    let info = services.debt_service.get_debtor(debtor, &actor()).await.unwrap();
    assert_eq!(info.debts.len(), 2);
    assert_eq!(info.debts[0].child_name, "Марія");
    assert_eq!(info.total_debt(), 200.0);

    let page = services
        .debt_service
        .list(
            &DebtFilter {
                group_number: Some("5".to_string()),
                ..Default::default()
            },
            &actor(),
        )
        .await
        .unwrap();
    assert_eq!(page.total_items, 1);
    assert_eq!(page.items[0].child_name, "Назар");

    assert_matches!(
        services.debt_service.get_debtor(debtor + 1, &actor()).await,
        Err(KindergartenError::NotFound(_))
    );
}
