//! User profile entity, the canonical record served from the cache.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A cached user profile.
///
/// Built from an upstream payload by [`crate::domain::normalizer::normalize`]
/// and stamped with the time of the fetch that produced it. `website` always
/// carries a scheme and `company_name` is the flattened upstream `company.name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub website: String,
    pub company_name: String,
    pub last_fetched_at: DateTime<Utc>,
}

impl UserProfile {
    /// Stamps a normalized profile with its fetch time.
    pub fn from_new(profile: NewProfile, last_fetched_at: DateTime<Utc>) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            username: profile.username,
            email: profile.email,
            website: profile.website,
            company_name: profile.company_name,
            last_fetched_at,
        }
    }
}

/// A normalized profile that has not been written yet.
///
/// The store assigns `last_fetched_at` on upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub website: String,
    pub company_name: String,
}
