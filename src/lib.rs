//! Kindergarten back office
//!
//! A REST service for kindergarten administration: groups, children rosters,
//! daily attendance (including the mobile attendance API), food costs,
//! parental billing and educator accounts, with an audit trail of every change.

pub mod config;
pub mod database;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{KindergartenError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use handlers::create_router;
pub use services::ServiceFactory;
pub use state::AppState;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
