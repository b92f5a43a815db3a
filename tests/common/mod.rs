#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use profile_cache::application::services::{ProfileService, ProfileServiceConfig};
use profile_cache::domain::clock::ManualClock;
use profile_cache::domain::entities::{NewProfile, UserProfile};
use profile_cache::domain::errors::{ProfileError, ProfileResult};
use profile_cache::domain::repositories::ProfileRepository;
use profile_cache::domain::upstream::UpstreamClient;
use profile_cache::infrastructure::persistence::MemoryProfileRepository;
use profile_cache::state::AppState;

pub fn t0() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-10-02T23:47:13Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// The first profile served by jsonplaceholder, trimmed to the fields we read
/// plus a few we discard.
pub fn leanne() -> Value {
    json!({
        "id": 1,
        "name": "Leanne Graham",
        "username": "Bret",
        "email": "Sincere@april.biz",
        "address": { "street": "Kulas Light", "city": "Gwenborough" },
        "phone": "1-770-736-8031 x56442",
        "website": "hildegard.org",
        "company": {
            "name": "Romaguera-Crona",
            "catchPhrase": "Multi-layered client-server neural-net",
            "bs": "harness real-time e-markets"
        }
    })
}

pub fn payload(id: i64, name: &str, website: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "username": format!("user{id}"),
        "email": format!("user{id}@example.com"),
        "website": website,
        "company": { "name": "Acme" }
    })
}

/// What [`FakeUpstream`] answers for an id.
#[derive(Debug, Clone)]
pub enum Reply {
    Profile(Value),
    NotFound,
    Unavailable,
}

/// In-process upstream with call counting and an optional delay.
///
/// Ids without a configured reply answer `NotFound`.
pub struct FakeUpstream {
    replies: Mutex<HashMap<i64, Reply>>,
    calls: Mutex<HashMap<i64, usize>>,
    total: AtomicUsize,
    delay: Duration,
}

impl FakeUpstream {
    pub fn new() -> Self {
        Self::with_delay(Duration::ZERO)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            replies: Mutex::new(HashMap::new()),
            calls: Mutex::new(HashMap::new()),
            total: AtomicUsize::new(0),
            delay,
        }
    }

    /// Upstream that knows Leanne Graham as id 1.
    pub fn with_leanne() -> Self {
        let upstream = Self::new();
        upstream.set(1, Reply::Profile(leanne()));
        upstream
    }

    pub fn set(&self, id: i64, reply: Reply) {
        self.replies.lock().unwrap().insert(id, reply);
    }

    pub fn calls(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    pub fn calls_for(&self, id: i64) -> usize {
        self.calls.lock().unwrap().get(&id).copied().unwrap_or(0)
    }
}

#[async_trait]
impl UpstreamClient for FakeUpstream {
    async fn fetch(&self, id: i64) -> ProfileResult<Value> {
        self.total.fetch_add(1, Ordering::SeqCst);
        *self.calls.lock().unwrap().entry(id).or_insert(0) += 1;

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or(Reply::NotFound);

        match reply {
            Reply::Profile(value) => Ok(value),
            Reply::NotFound => Err(ProfileError::UpstreamNotFound { id }),
            Reply::Unavailable => Err(ProfileError::upstream_unavailable("upstream returned 503")),
        }
    }
}

/// Repository whose backend is down.
pub struct UnreachableRepository;

#[async_trait]
impl ProfileRepository for UnreachableRepository {
    async fn get(&self, _id: i64) -> ProfileResult<Option<UserProfile>> {
        Err(ProfileError::store("connection refused"))
    }

    async fn upsert(
        &self,
        _profile: NewProfile,
        _fetched_at: DateTime<Utc>,
    ) -> ProfileResult<UserProfile> {
        Err(ProfileError::store("connection refused"))
    }

    async fn count(&self) -> ProfileResult<i64> {
        Err(ProfileError::store("connection refused"))
    }

    async fn all(&self) -> ProfileResult<Vec<UserProfile>> {
        Err(ProfileError::store("connection refused"))
    }

    async fn health_check(&self) -> bool {
        false
    }
}

/// A service wired to in-memory collaborators, with handles kept for assertions.
pub struct TestContext {
    pub service: Arc<ProfileService>,
    pub repository: Arc<MemoryProfileRepository>,
    pub upstream: Arc<FakeUpstream>,
    pub clock: Arc<ManualClock>,
}

impl TestContext {
    pub fn new(upstream: FakeUpstream) -> Self {
        Self::with_config(upstream, ProfileServiceConfig::default())
    }

    pub fn with_config(upstream: FakeUpstream, config: ProfileServiceConfig) -> Self {
        let repository = Arc::new(MemoryProfileRepository::new());
        let upstream = Arc::new(upstream);
        let clock = Arc::new(ManualClock::new(t0()));

        let service = Arc::new(ProfileService::new(
            repository.clone(),
            upstream.clone(),
            clock.clone(),
            config,
        ));

        Self {
            service,
            repository,
            upstream,
            clock,
        }
    }

    pub fn state(&self) -> AppState {
        AppState::new(self.service.clone())
    }
}

/// State whose repository is unreachable.
pub fn unreachable_state() -> AppState {
    let service = ProfileService::new(
        Arc::new(UnreachableRepository),
        Arc::new(FakeUpstream::with_leanne()),
        Arc::new(ManualClock::new(t0())),
        ProfileServiceConfig::default(),
    );
    AppState::new(Arc::new(service))
}
