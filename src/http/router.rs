//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Pickups
        .route(
            "/users/{user_id}/pickups",
            get(handlers::get_upcoming_pickups),
        )
        .route(
            "/users/{user_id}/pickups/refresh",
            post(handlers::refresh_pickups),
        )
        // Zone browsing
        .route("/zones/{zone}/schedules", get(handlers::list_zone_schedules))
        // Live stop updates
        .route(
            "/schedules/{schedule_id}/stops/live",
            get(handlers::stream_schedule_stops),
        );

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
