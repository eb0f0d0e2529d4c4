//! HTTP handlers module
//!
//! This module contains the axum handlers organized by entity and the
//! router that mounts them under the configured prefix:
//! - Listing (`POST /<entity>/filter`), get, create, update and delete routes
//! - Mobile attendance read and save routes
//! - Educator verification
//! - Debtor listing and debtor details

pub mod admins;
pub mod attendance;
pub mod billing;
pub mod children;
pub mod context;
pub mod debts;
pub mod food_cost;
pub mod groups;

pub use context::{JsonBody, PathParam, RequestContext};

use axum::{
    extract::State,
    handler::Handler,
    http::{HeaderValue, StatusCode},
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::middleware::auth::require_auth;
use crate::middleware::logging::log_requests;
use crate::middleware::rate_limit::limit_views;
use crate::state::AppState;

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    let throttle = from_fn_with_state(state.rate_limiter.clone(), limit_views);

    let api = Router::new()
        // Debtors
        .route("/filter", post(debts::list_debts))
        .route("/info/:id", get(debts::get_debtor.layer(throttle.clone())))
        // Groups
        .route("/groups/filter", post(groups::list_groups))
        .route("/groups", post(groups::create_group))
        .route(
            "/groups/:id",
            get(groups::get_group.layer(throttle.clone()))
                .put(groups::update_group)
                .delete(groups::delete_group),
        )
        // Children roster
        .route("/childrenRoster/filter", post(children::list_children))
        .route("/childrenRoster", post(children::create_child))
        .route(
            "/childrenRoster/:id",
            get(children::get_child.layer(throttle.clone()))
                .put(children::update_child)
                .delete(children::delete_child),
        )
        // Attendance; the static mobile paths win over `:id`
        .route("/attendance/filter", post(attendance::list_attendance))
        .route("/attendance", post(attendance::create_attendance))
        .route("/attendance/mobile", post(attendance::save_mobile_attendance))
        .route("/attendance/mobile/:date", get(attendance::mobile_attendance))
        .route(
            "/attendance/:id",
            get(attendance::get_attendance.layer(throttle.clone()))
                .put(attendance::update_attendance)
                .delete(attendance::delete_attendance),
        )
        // Daily food cost
        .route("/daily_food_cost/filter", post(food_cost::list_food_costs))
        .route("/daily_food_cost", post(food_cost::create_food_cost))
        .route(
            "/daily_food_cost/:id",
            get(food_cost::get_food_cost.layer(throttle.clone()))
                .put(food_cost::update_food_cost)
                .delete(food_cost::delete_food_cost),
        )
        // Billing
        .route("/billing/filter", post(billing::list_billing))
        .route("/billing", post(billing::create_billing))
        .route(
            "/billing/:id",
            get(billing::get_billing.layer(throttle.clone()))
                .put(billing::update_billing)
                .delete(billing::delete_billing),
        )
        // Admins
        .route("/admins/filter", post(admins::list_admins))
        .route("/admins/verify", post(admins::verify_educator))
        .route("/admins", post(admins::create_admin))
        .route(
            "/admins/:id",
            get(admins::get_admin.layer(throttle))
                .put(admins::update_admin)
                .delete(admins::delete_admin),
        )
        .layer(from_fn_with_state(state.auth.clone(), require_auth));

    Router::new()
        .route("/health", get(health))
        .nest(&state.settings.server.route_prefix, api)
        .layer(axum::middleware::from_fn(log_requests))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.settings.server.cors_origins))
        .with_state(state)
}

/// `GET /health`: 200 while the database answers, 503 otherwise
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.services.health_check().await;
    let code = if status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        code,
        Json(json!({
            "healthy": status.is_healthy(),
            "services": status,
            "issues": status.get_issues(),
            "version": crate::VERSION,
        })),
    )
}

/// Body returned by every delete route
pub(crate) fn deleted(id: i64) -> Json<serde_json::Value> {
    Json(json!({ "success": true, "id": id }))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}
