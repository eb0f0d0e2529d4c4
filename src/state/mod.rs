//! State management module
//!
//! This module holds the shared application state handed to every handler

use std::sync::Arc;

use crate::config::Settings;
use crate::middleware::{AuthMiddleware, RateLimitMiddleware};
use crate::services::ServiceFactory;

/// Application state, cloned into each request
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<ServiceFactory>,
    pub settings: Arc<Settings>,
    pub auth: AuthMiddleware,
    pub rate_limiter: RateLimitMiddleware,
}

impl AppState {
    pub fn new(services: ServiceFactory, settings: Settings) -> Self {
        Self {
            auth: AuthMiddleware::new(&settings.auth),
            rate_limiter: RateLimitMiddleware::new(&settings.rate_limit, settings.server.trust_forwarded_for),
            services: Arc::new(services),
            settings: Arc::new(settings),
        }
    }
}
