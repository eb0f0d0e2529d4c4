//! Rate limiting middleware
//!
//! Throttles get-by-id requests per client IP with a keyed `governor`
//! limiter. Idle clients are pruned by a background task.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::client_ip;
use crate::config::RateLimitConfig;
use crate::utils::errors::{KindergartenError, Result};

/// Key used for requests whose origin cannot be determined
const UNKNOWN_CLIENT: &str = "unknown";

/// Rate limiting middleware
#[derive(Clone)]
pub struct RateLimitMiddleware {
    limiter: Arc<DefaultKeyedRateLimiter<String>>,
    trust_forwarded_for: bool,
}

impl RateLimitMiddleware {
    /// Create a new RateLimitMiddleware instance
    pub fn new(config: &RateLimitConfig, trust_forwarded_for: bool) -> Self {
        let per_minute = NonZeroU32::new(config.view_per_minute).unwrap_or(NonZeroU32::MIN);

        Self {
            limiter: Arc::new(RateLimiter::keyed(Quota::per_minute(per_minute))),
            trust_forwarded_for,
        }
    }

    /// Count one request from `client`, failing once its quota is spent
    pub fn check(&self, client: &str) -> Result<()> {
        self.limiter.check_key(&client.to_string()).map_err(|_| {
            warn!(client = client, "Rate limit exceeded");
            KindergartenError::RateLimitExceeded
        })
    }

    /// Number of clients currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }

    /// Drop clients whose quota has fully replenished
    pub fn cleanup_old_entries(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        debug!(remaining_entries = self.limiter.len(), "Cleaned up old rate limit entries");
    }

    /// Run `cleanup_old_entries` every `period` until the runtime stops
    pub fn spawn_cleanup(&self, period: Duration) -> JoinHandle<()> {
        let limiter = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                limiter.cleanup_old_entries();
            }
        })
    }
}

/// Layer function for the throttled routes
pub async fn limit_views(State(limiter): State<RateLimitMiddleware>, request: Request, next: Next) -> Response {
    let client = client_ip(request.headers(), request.extensions(), limiter.trust_forwarded_for)
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string());

    match limiter.check(&client) {
        Ok(()) => next.run(request).await,
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(view_per_minute: u32) -> RateLimitConfig {
        RateLimitConfig {
            view_per_minute,
            cleanup_interval_seconds: 300,
        }
    }

    #[test]
    fn test_quota_is_per_client() {
        let limiter = RateLimitMiddleware::new(&config(2), false);

        assert!(limiter.check("10.0.0.1").is_ok());
        assert!(limiter.check("10.0.0.1").is_ok());
        assert!(matches!(
            limiter.check("10.0.0.1"),
            Err(KindergartenError::RateLimitExceeded)
        ));
        assert!(limiter.check("10.0.0.2").is_ok());
    }

    #[test]
    fn test_cleanup_keeps_spent_quota() {
        let limiter = RateLimitMiddleware::new(&config(1), false);

        assert!(limiter.check("10.0.0.1").is_ok());
        assert_eq!(limiter.tracked_clients(), 1);

        limiter.cleanup_old_entries();

        assert_eq!(limiter.tracked_clients(), 1);
        assert!(matches!(
            limiter.check("10.0.0.1"),
            Err(KindergartenError::RateLimitExceeded)
        ));
    }

    #[tokio::test]
    async fn test_cleanup_task_runs_in_background() {
        let limiter = RateLimitMiddleware::new(&config(1), false);
        let handle = limiter.spawn_cleanup(Duration::from_millis(10));

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(!handle.is_finished());
        handle.abort();
    }
}
