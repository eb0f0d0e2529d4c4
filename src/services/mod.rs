//! Services module
//!
//! This module contains business logic services

pub mod audit;
pub mod group;
pub mod child;
pub mod attendance;
pub mod reconciliation;
pub mod food_cost;
pub mod billing;
pub mod admin;
pub mod debt;

// Re-export commonly used services
pub use audit::AuditService;
pub use group::GroupService;
pub use child::ChildService;
pub use attendance::AttendanceService;
pub use reconciliation::ReconciliationService;
pub use food_cost::FoodCostService;
pub use billing::BillingService;
pub use admin::AdminService;
pub use debt::DebtService;

use crate::config::settings::Settings;
use crate::database::DatabaseService;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub group_service: GroupService,
    pub child_service: ChildService,
    pub attendance_service: AttendanceService,
    pub reconciliation_service: ReconciliationService,
    pub food_cost_service: FoodCostService,
    pub billing_service: BillingService,
    pub admin_service: AdminService,
    pub debt_service: DebtService,
    database: DatabaseService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(database: DatabaseService, settings: &Settings) -> Self {
        let audit = AuditService::new(database.audit.clone(), settings.audit.clone());
        let pagination = settings.pagination.clone();

        Self {
            group_service: GroupService::new(database.groups.clone(), audit.clone(), pagination.clone()),
            child_service: ChildService::new(
                database.children.clone(),
                database.groups.clone(),
                audit.clone(),
                pagination.clone(),
            ),
            attendance_service: AttendanceService::new(
                database.attendance.clone(),
                database.children.clone(),
                audit.clone(),
                pagination.clone(),
            ),
            reconciliation_service: ReconciliationService::new(
                database.attendance.clone(),
                database.children.clone(),
                database.groups.clone(),
                audit.clone(),
            ),
            food_cost_service: FoodCostService::new(database.food_costs.clone(), audit.clone(), pagination.clone()),
            billing_service: BillingService::new(database.billing.clone(), audit.clone(), pagination.clone()),
            admin_service: AdminService::new(
                database.admins.clone(),
                audit.clone(),
                pagination.clone(),
                settings.phone.clone(),
            ),
            debt_service: DebtService::new(database.debts.clone(), audit, pagination),
            database,
        }
    }

    /// Health check for the storage behind the services
    pub async fn health_check(&self) -> ServiceHealthStatus {
        let database_healthy = match self.database.health_check().await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "Database health check failed");
                false
            }
        };

        ServiceHealthStatus { database_healthy }
    }
}

/// Health status for all services
#[derive(Debug, Clone, serde::Serialize)]
pub struct ServiceHealthStatus {
    pub database_healthy: bool,
}

impl ServiceHealthStatus {
    /// Check if all critical services are healthy
    pub fn is_healthy(&self) -> bool {
        self.database_healthy
    }

    /// Get list of unhealthy services
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.database_healthy {
            issues.push("Database connection failed".to_string());
        }

        issues
    }
}
