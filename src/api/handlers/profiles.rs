//! Handlers for profile endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::time::Duration;
use validator::Validate;

use crate::api::dto::profile::{
    CountResponse, GetProfileQuery, ProfileListResponse, StaleQuery, StaleResponse,
};
use crate::domain::entities::UserProfile;
use crate::error::AppError;
use crate::state::AppState;

/// Returns one profile, served from cache while fresh.
///
/// # Endpoint
///
/// `GET /api/users/{id}?bypassCache=true`
///
/// # Errors
///
/// - 404 if upstream has no such profile
/// - 502 if upstream is unavailable or returned a malformed payload
/// - 500 on database errors
pub async fn get_profile_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<GetProfileQuery>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = state.profile_service.get(id, query.bypass_cache).await?;
    Ok(Json(profile))
}

/// Refetches one profile from upstream regardless of cache state.
///
/// # Endpoint
///
/// `POST /api/users/{id}/refresh`
pub async fn refresh_profile_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = state.profile_service.refresh(id).await?;
    Ok(Json(profile))
}

/// Lists every cached profile ordered by id.
///
/// # Endpoint
///
/// `GET /api/users`
pub async fn list_profiles_handler(
    State(state): State<AppState>,
) -> Result<Json<ProfileListResponse>, AppError> {
    let items = state.profile_service.list_all().await?;
    Ok(Json(ProfileListResponse {
        total: items.len(),
        items,
    }))
}

/// # Endpoint
///
/// `GET /api/users/count`
pub async fn count_profiles_handler(
    State(state): State<AppState>,
) -> Result<Json<CountResponse>, AppError> {
    let count = state.profile_service.count().await?;
    Ok(Json(CountResponse { count }))
}

/// Lists ids of cached profiles older than the TTL.
///
/// # Endpoint
///
/// `GET /api/users/stale?ttlSeconds=N`
///
/// # Errors
///
/// Returns 400 Bad Request if `ttlSeconds` is zero.
pub async fn stale_profiles_handler(
    State(state): State<AppState>,
    Query(query): Query<StaleQuery>,
) -> Result<Json<StaleResponse>, AppError> {
    query.validate()?;

    let ttl = query
        .ttl_seconds
        .map(Duration::from_secs)
        .unwrap_or_else(|| state.profile_service.ttl());

    let ids = state.profile_service.list_stale(Some(ttl)).await?;

    Ok(Json(StaleResponse {
        ttl_seconds: ttl.as_secs(),
        ids,
    }))
}
