//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health` - Health check: profile store and in-flight refreshes
//! - `/api/*`       - Profile REST API
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Permissive, the API is read-mostly and unauthenticated
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api::routes::profile_routes())
        .with_state(state)
        .layer(tracing::layer())
        .layer(CorsLayer::permissive());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
