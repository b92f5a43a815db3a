//! In-process profile repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::entities::{NewProfile, UserProfile};
use crate::domain::errors::ProfileResult;
use crate::domain::repositories::ProfileRepository;

/// A repository that keeps profiles in memory.
///
/// Not durable: contents are lost when the process exits. Each upsert holds
/// the shard entry for its id for the whole read-modify-write, so writes to
/// one id are serialized while other ids stay unaffected.
///
/// # Use Cases
///
/// - Tests that exercise the service without PostgreSQL
/// - Local runs where persistence does not matter
#[derive(Debug, Default)]
pub struct MemoryProfileRepository {
    profiles: DashMap<i64, UserProfile>,
    writes: AtomicUsize,
}

impl MemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-filled with `profiles`.
    pub fn with_profiles(profiles: impl IntoIterator<Item = UserProfile>) -> Self {
        let repository = Self::new();
        for profile in profiles {
            repository.profiles.insert(profile.id, profile);
        }
        repository
    }

    /// Number of upserts performed since creation.
    pub fn upsert_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileRepository for MemoryProfileRepository {
    async fn get(&self, id: i64) -> ProfileResult<Option<UserProfile>> {
        Ok(self.profiles.get(&id).map(|entry| entry.value().clone()))
    }

    async fn upsert(
        &self,
        profile: NewProfile,
        fetched_at: DateTime<Utc>,
    ) -> ProfileResult<UserProfile> {
        self.writes.fetch_add(1, Ordering::SeqCst);

        let stored = match self.profiles.entry(profile.id) {
            Entry::Occupied(mut entry) => {
                let last_fetched_at = fetched_at.max(entry.get().last_fetched_at);
                let updated = UserProfile::from_new(profile, last_fetched_at);
                entry.insert(updated.clone());
                updated
            }
            Entry::Vacant(entry) => {
                let created = UserProfile::from_new(profile, fetched_at);
                entry.insert(created.clone());
                created
            }
        };

        Ok(stored)
    }

    async fn count(&self) -> ProfileResult<i64> {
        Ok(self.profiles.len() as i64)
    }

    async fn all(&self) -> ProfileResult<Vec<UserProfile>> {
        let mut profiles: Vec<UserProfile> = self
            .profiles
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        profiles.sort_by_key(|profile| profile.id);
        Ok(profiles)
    }

    async fn health_check(&self) -> bool {
        true
    }
}
