//! Database service layer
//!
//! Bundles one store per entity. Services receive the stores as trait
//! objects, so the same wiring runs against PostgreSQL or in-memory stores.

use std::sync::Arc;

use crate::database::connection::{self, DatabasePool};
use crate::database::repositories::*;
use crate::utils::errors::Result;

#[derive(Clone)]
pub struct DatabaseService {
    pub groups: Arc<dyn GroupStore>,
    pub children: Arc<dyn ChildStore>,
    pub attendance: Arc<dyn AttendanceStore>,
    pub food_costs: Arc<dyn FoodCostStore>,
    pub billing: Arc<dyn BillingStore>,
    pub admins: Arc<dyn AdminStore>,
    pub debts: Arc<dyn DebtStore>,
    pub audit: Arc<dyn AuditStore>,
    pool: Option<DatabasePool>,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            groups: Arc::new(GroupRepository::new(pool.clone())),
            children: Arc::new(ChildRepository::new(pool.clone())),
            attendance: Arc::new(AttendanceRepository::new(pool.clone())),
            food_costs: Arc::new(FoodCostRepository::new(pool.clone())),
            billing: Arc::new(BillingRepository::new(pool.clone())),
            admins: Arc::new(AdminRepository::new(pool.clone())),
            debts: Arc::new(DebtRepository::new(pool.clone())),
            audit: Arc::new(AuditRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Wire arbitrary store implementations, with no pool behind them
    #[allow(clippy::too_many_arguments)]
    pub fn from_stores(
        groups: Arc<dyn GroupStore>,
        children: Arc<dyn ChildStore>,
        attendance: Arc<dyn AttendanceStore>,
        food_costs: Arc<dyn FoodCostStore>,
        billing: Arc<dyn BillingStore>,
        admins: Arc<dyn AdminStore>,
        debts: Arc<dyn DebtStore>,
        audit: Arc<dyn AuditStore>,
    ) -> Self {
        Self {
            groups,
            children,
            attendance,
            food_costs,
            billing,
            admins,
            debts,
            audit,
            pool: None,
        }
    }

    /// Ping the database; stores without a pool are always healthy
    pub async fn health_check(&self) -> Result<()> {
        match &self.pool {
            Some(pool) => connection::health_check(pool).await,
            None => Ok(()),
        }
    }
}
