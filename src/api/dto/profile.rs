//! DTOs for profile endpoints.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use crate::domain::entities::UserProfile;

/// Query parameters for `GET /api/users/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct GetProfileQuery {
    /// Skip the cache and refetch from upstream.
    #[serde(rename = "bypassCache", default)]
    pub bypass_cache: bool,
}

/// Query parameters for `GET /api/users/stale`.
#[serde_as]
#[derive(Debug, Default, Deserialize, Validate)]
pub struct StaleQuery {
    /// TTL override in seconds; the configured TTL is used when absent.
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(rename = "ttlSeconds", default)]
    #[validate(range(min = 1, message = "ttlSeconds must be greater than 0"))]
    pub ttl_seconds: Option<u64>,
}

/// All cached profiles.
#[derive(Debug, Serialize)]
pub struct ProfileListResponse {
    pub total: usize,
    pub items: Vec<UserProfile>,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: i64,
}

/// Ids of cached profiles older than `ttl_seconds`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaleResponse {
    pub ttl_seconds: u64,
    pub ids: Vec<i64>,
}
