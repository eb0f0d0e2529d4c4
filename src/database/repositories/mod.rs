//! Database repositories module
//!
//! Each entity has a storage trait, the seam the services depend on, and a
//! PostgreSQL repository implementing it.

pub mod group;
pub mod child;
pub mod attendance;
pub mod food_cost;
pub mod billing;
pub mod admin;
pub mod debt;
pub mod audit;

// Re-export repositories
pub use group::{GroupRepository, GroupStore};
pub use child::{ChildRepository, ChildStore};
pub use attendance::{AttendanceRepository, AttendanceStore};
pub use food_cost::{FoodCostRepository, FoodCostStore};
pub use billing::{BillingRepository, BillingStore};
pub use admin::{AdminRepository, AdminStore};
pub use debt::{DebtRepository, DebtStore};
pub use audit::{AuditRepository, AuditStore};
