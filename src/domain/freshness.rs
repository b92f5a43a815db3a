//! Cache freshness policy.
//!
//! Pure functions over timestamps: no I/O, no clock access. The current time
//! is always passed in by the caller.

use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;

use crate::domain::entities::UserProfile;

/// Returns true if a record fetched at `last_fetched_at` is still usable at `now`.
///
/// A record whose age equals `ttl` exactly is fresh. Timestamps in the future
/// (clock skew) are treated as fresh.
pub fn is_fresh(last_fetched_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    let age = now.signed_duration_since(last_fetched_at);
    match TimeDelta::from_std(ttl) {
        Ok(ttl) => age <= ttl,
        // TTL beyond chrono's range never expires.
        Err(_) => true,
    }
}

/// Returns the ids of records older than `ttl` at `now`, in input order.
pub fn list_stale(records: &[UserProfile], ttl: Duration, now: DateTime<Utc>) -> Vec<i64> {
    records
        .iter()
        .filter(|record| !is_fresh(record.last_fetched_at, now, ttl))
        .map(|record| record.id)
        .collect()
}

/// The configured freshness TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    ttl: Duration,
}

impl FreshnessPolicy {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn is_fresh(&self, last_fetched_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        is_fresh(last_fetched_at, now, self.ttl)
    }
}

impl Default for FreshnessPolicy {
    /// Ten minutes.
    fn default() -> Self {
        Self::new(Duration::from_secs(600))
    }
}
