//! Route definitions for the recipe API
//!
//! This module organizes all API routes and applies middleware.

use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod auth;
mod extract;
mod health;
mod ingredients;
mod recipes;
mod tags;


pub use auth::auth_routes;
pub use extract::{ApiJson, ApiPath, ApiQuery};
pub use ingredients::ingredient_routes;
pub use recipes::recipe_routes;
pub use tags::tag_routes;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    let media = ServeDir::new(state.media().root());
    let body_limit = state.config().media.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .nest("/api/v1", api_routes())
        .nest_service("/media", media)
        // Apply middleware layers
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                ])
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
        .route("/", get(|| async { "Recipe API v1" }))
        .nest("/auth", auth::auth_routes())
        .nest("/recipe", recipe_api_routes())
}

/// Routes under /api/v1/recipe
fn recipe_api_routes() -> Router<AppState> {
    Router::new()
        .nest("/tags", tags::tag_routes())
        .nest("/ingredients", ingredients::ingredient_routes())
        .nest("/recipes", recipes::recipe_routes())
}
