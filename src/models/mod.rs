//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod common;
pub mod group;
pub mod child;
pub mod attendance;
pub mod mobile;
pub mod food_cost;
pub mod billing;
pub mod admin;
pub mod debt;
pub mod audit;

// Re-export commonly used models
pub use common::{ListParams, PageWindow, Paginated};
pub use group::{Group, GroupType, CreateGroupRequest, UpdateGroupRequest, GroupFilter};
pub use child::{Child, CreateChildRequest, UpdateChildRequest, NewChild, ChildChanges, ChildFilter};
pub use attendance::{
    AttendanceRecord, AttendanceStatus, CreateAttendanceRequest, UpdateAttendanceRequest,
    AttendanceSheetRow, AttendanceSheetFilter, RosterEntry,
};
pub use mobile::{
    MobileAttendanceRequest, GroupSelection, ChildSelection, AttendanceBatch, BatchKind,
    ReconciliationAction, ChildOutcome, BatchError, BatchDetails, BatchSummary,
    MobileAttendanceView, MobileGroupView, MobileChildView,
};
pub use food_cost::{DailyFoodCost, CreateFoodCostRequest, UpdateFoodCostRequest, FoodCostFilter};
pub use billing::{
    BillingRecord, CreateBillingRequest, UpdateBillingRequest, NewBilling, BillingChanges,
    BillingFilter, billing_balance,
};
pub use admin::{
    Admin, AdminRole, CreateAdminRequest, UpdateAdminRequest, AdminFilter, VerifyEducatorRequest,
    EducatorInfo, EducatorVerification,
};
pub use debt::{Debt, Debtor, DebtFilter};
pub use audit::{Actor, AuditAction, AuditEvent};
