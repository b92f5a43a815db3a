//! API route configuration.

use crate::api::handlers::{
    count_profiles_handler, get_profile_handler, list_profiles_handler, refresh_profile_handler,
    stale_profiles_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Profile routes, mounted under `/api`.
///
/// # Endpoints
///
/// - `GET  /users`              - List cached profiles
/// - `GET  /users/count`        - Number of cached profiles
/// - `GET  /users/stale`        - Ids of profiles older than the TTL
/// - `GET  /users/{id}`         - One profile, cached while fresh
/// - `POST /users/{id}/refresh` - Force a refetch from upstream
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_profiles_handler))
        .route("/users/count", get(count_profiles_handler))
        .route("/users/stale", get(stale_profiles_handler))
        .route("/users/{id}", get(get_profile_handler))
        .route("/users/{id}/refresh", post(refresh_profile_handler))
}
