//! Route definitions for the Wellness Coach API
//!
//! This module organizes all API routes and applies middleware.

use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod alerts;
mod health;
mod plans;
mod safety;
mod user;

pub use alerts::alert_routes;
pub use plans::plan_routes;
pub use safety::safety_routes;
pub use user::user_routes;

/// Request bodies above this size are rejected
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    // Agent calls can take up to the configured timeout
    let request_timeout = Duration::from_secs(state.config().agent.timeout_secs + 30);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(health::metrics))
        .nest("/api/v1", api_routes())
        .layer(CompressionLayer::new())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API v1 routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "Wellness Coach API v1" }))
        .nest(
            "/user",
            user_routes()
                .merge(plan_routes())
                .nest("/emergency-alerts", alert_routes()),
        )
        .nest("/safety", safety_routes())
}
