//! Test helpers module
//!
//! In-memory stores standing in for PostgreSQL, fixtures built with `fake`,
//! and a few shortcuts for wiring services and the router on top of them.

#![allow(dead_code)]

pub mod fixtures;
pub mod memory_store;

pub use fixtures::*;
pub use memory_store::*;

use kindergarten_office::config::Settings;
use kindergarten_office::middleware::auth::{issue_token, Claims, Permission};
use kindergarten_office::models::Actor;
use kindergarten_office::{AppState, ServiceFactory};

pub const TEST_SECRET: &str = "test-secret";

/// Default settings with a known JWT secret
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.auth.jwt_secret = TEST_SECRET.to_string();
    settings
}

/// Services running on the given in-memory stores
pub fn services(stores: &MemoryStores) -> ServiceFactory {
    ServiceFactory::new(stores.database(), &test_settings())
}

pub fn app_state(stores: &MemoryStores) -> AppState {
    AppState::new(services(stores), test_settings())
}

pub fn actor() -> Actor {
    Actor::new(Some(42), Some("10.0.0.7".to_string()))
}

/// Signed bearer token for actor 42 with the given permissions
pub fn bearer(permissions: &[Permission]) -> String {
    let claims = Claims {
        sub: 42,
        permissions: permissions.to_vec(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    format!("Bearer {}", issue_token(&claims, TEST_SECRET).unwrap())
}
