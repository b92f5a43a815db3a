//! Repository trait for cached profile storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::domain::entities::{NewProfile, UserProfile};
use crate::domain::errors::ProfileResult;
use crate::domain::freshness;

/// Durable keyed storage for canonical profiles.
///
/// The repository is the source of truth for whether an id is cached. Each
/// upsert is atomic for its id and never moves `last_fetched_at` backwards;
/// upserts of different ids do not contend.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgProfileRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryProfileRepository`] - In-process, non-durable
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_profile.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Finds a profile by id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::errors::ProfileError::Store`] on storage errors.
    async fn get(&self, id: i64) -> ProfileResult<Option<UserProfile>>;

    /// Inserts or fully overwrites the profile keyed by `profile.id`.
    ///
    /// `last_fetched_at` becomes the later of `fetched_at` and the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::errors::ProfileError::Store`] on storage errors,
    /// including constraint violations.
    async fn upsert(
        &self,
        profile: NewProfile,
        fetched_at: DateTime<Utc>,
    ) -> ProfileResult<UserProfile>;

    /// Counts cached profiles.
    async fn count(&self) -> ProfileResult<i64>;

    /// Returns every cached profile ordered by id.
    async fn all(&self) -> ProfileResult<Vec<UserProfile>>;

    /// Returns the ids of cached profiles older than `ttl` at `now`.
    async fn list_stale(&self, ttl: Duration, now: DateTime<Utc>) -> ProfileResult<Vec<i64>> {
        let records = self.all().await?;
        Ok(freshness::list_stale(&records, ttl, now))
    }

    /// Checks whether the storage backend is reachable.
    async fn health_check(&self) -> bool;
}
