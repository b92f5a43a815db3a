//! Profile caching service.

use futures::FutureExt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::domain::clock::Clock;
use crate::domain::entities::UserProfile;
use crate::domain::errors::{ProfileError, ProfileResult};
use crate::domain::freshness::FreshnessPolicy;
use crate::domain::normalizer::normalize;
use crate::domain::repositories::ProfileRepository;
use crate::domain::upstream::UpstreamClient;
use crate::utils::single_flight::SingleFlight;

/// Tunables for [`ProfileService`].
#[derive(Debug, Clone)]
pub struct ProfileServiceConfig {
    /// Maximum age of a cached record before it is refetched.
    pub ttl: Duration,
    /// Upper bound for one upstream call; `None` leaves it to the client's own timeouts.
    pub request_deadline: Option<Duration>,
    /// Serve a stale record when upstream is unavailable instead of failing.
    pub stale_fallback: bool,
}

impl Default for ProfileServiceConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            request_deadline: Some(Duration::from_secs(15)),
            stale_fallback: false,
        }
    }
}

/// Serves profiles from the repository while they are fresh and refetches
/// them from upstream otherwise.
///
/// # Concurrency
///
/// Refreshes are coalesced per id: while a fetch for an id is in flight, other
/// refreshes of that id wait for it and share its result, so upstream sees one
/// call and the repository one upsert. Refreshes of different ids run
/// independently. The fetch runs as its own task: a caller that gives up
/// (timeout, disconnect) stops waiting but does not cancel it.
pub struct ProfileService {
    repository: Arc<dyn ProfileRepository>,
    upstream: Arc<dyn UpstreamClient>,
    clock: Arc<dyn Clock>,
    policy: FreshnessPolicy,
    request_deadline: Option<Duration>,
    stale_fallback: bool,
    refreshes: SingleFlight<i64, ProfileResult<UserProfile>>,
}

impl ProfileService {
    /// Creates a new profile service.
    pub fn new(
        repository: Arc<dyn ProfileRepository>,
        upstream: Arc<dyn UpstreamClient>,
        clock: Arc<dyn Clock>,
        config: ProfileServiceConfig,
    ) -> Self {
        Self {
            repository,
            upstream,
            clock,
            policy: FreshnessPolicy::new(config.ttl),
            request_deadline: config.request_deadline,
            stale_fallback: config.stale_fallback,
            refreshes: SingleFlight::new(),
        }
    }

    /// Returns the profile for `id`, from cache when fresh.
    ///
    /// With `bypass_cache` the repository is not consulted and the profile is
    /// always refetched.
    ///
    /// # Errors
    ///
    /// - [`ProfileError::NotFound`] if upstream has no such profile
    /// - [`ProfileError::UpstreamUnavailable`] if the refetch fails; a stale
    ///   record is served instead only when stale fallback is enabled
    /// - [`ProfileError::Normalization`] if upstream returned a malformed payload
    /// - [`ProfileError::Store`] on repository errors
    pub async fn get(&self, id: i64, bypass_cache: bool) -> ProfileResult<UserProfile> {
        let mut stale = None;

        if bypass_cache {
            debug!(id, "Cache BYPASS");
            metrics::counter!("profile_cache_lookups_total", "outcome" => "bypass").increment(1);
        } else {
            match self.repository.get(id).await? {
                Some(profile) if self.policy.is_fresh(profile.last_fetched_at, self.clock.now()) => {
                    debug!(id, "Cache HIT");
                    metrics::counter!("profile_cache_lookups_total", "outcome" => "hit")
                        .increment(1);
                    return Ok(profile);
                }
                Some(profile) => {
                    debug!(id, last_fetched_at = %profile.last_fetched_at, "Cache STALE");
                    metrics::counter!("profile_cache_lookups_total", "outcome" => "stale")
                        .increment(1);
                    stale = Some(profile);
                }
                None => {
                    debug!(id, "Cache MISS");
                    metrics::counter!("profile_cache_lookups_total", "outcome" => "miss")
                        .increment(1);
                }
            }
        }

        match self.refresh(id).await {
            Ok(profile) => Ok(profile),
            Err(ProfileError::UpstreamNotFound { id }) => Err(ProfileError::NotFound { id }),
            Err(err @ ProfileError::UpstreamUnavailable { .. }) => match stale {
                Some(profile) if self.stale_fallback => {
                    warn!(id, error = %err, "Serving stale profile");
                    Ok(profile)
                }
                _ => Err(err),
            },
            Err(err) => Err(err),
        }
    }

    /// Fetches, normalizes and stores the profile for `id` regardless of what
    /// is cached.
    ///
    /// # Errors
    ///
    /// - [`ProfileError::UpstreamNotFound`] if upstream has no such profile
    /// - [`ProfileError::UpstreamUnavailable`] on transport failure, error status
    ///   or deadline expiry
    /// - [`ProfileError::Normalization`] if the payload is malformed
    /// - [`ProfileError::Store`] if the upsert fails
    pub async fn refresh(&self, id: i64) -> ProfileResult<UserProfile> {
        let repository = Arc::clone(&self.repository);
        let upstream = Arc::clone(&self.upstream);
        let clock = Arc::clone(&self.clock);
        let deadline = self.request_deadline;

        let (result, joined) = self
            .refreshes
            .run(id, move || {
                fetch_and_store(id, repository, upstream, clock, deadline).boxed()
            })
            .await;

        if joined {
            debug!(id, "Joined in-flight refresh");
            metrics::counter!("profile_refresh_coalesced_total").increment(1);
        }

        result.unwrap_or_else(|aborted| {
            warn!(id, "Refresh task aborted");
            Err(ProfileError::upstream_unavailable(aborted.to_string()))
        })
    }

    /// Returns every cached profile ordered by id.
    pub async fn list_all(&self) -> ProfileResult<Vec<UserProfile>> {
        self.repository.all().await
    }

    /// Counts cached profiles.
    pub async fn count(&self) -> ProfileResult<i64> {
        self.repository.count().await
    }

    /// Returns ids of cached profiles older than `ttl` (the configured TTL if
    /// `None`).
    pub async fn list_stale(&self, ttl: Option<Duration>) -> ProfileResult<Vec<i64>> {
        let ttl = ttl.unwrap_or(self.policy.ttl());
        self.repository.list_stale(ttl, self.clock.now()).await
    }

    /// The configured freshness TTL.
    pub fn ttl(&self) -> Duration {
        self.policy.ttl()
    }

    /// Number of ids with a refresh in flight.
    pub fn in_flight(&self) -> usize {
        self.refreshes.len()
    }

    /// Whether the repository backend is reachable.
    pub async fn store_healthy(&self) -> bool {
        self.repository.health_check().await
    }
}

async fn fetch_and_store(
    id: i64,
    repository: Arc<dyn ProfileRepository>,
    upstream: Arc<dyn UpstreamClient>,
    clock: Arc<dyn Clock>,
    deadline: Option<Duration>,
) -> ProfileResult<UserProfile> {
    let fetched = match deadline {
        Some(deadline) => tokio::time::timeout(deadline, upstream.fetch(id))
            .await
            .unwrap_or_else(|_| {
                Err(ProfileError::upstream_unavailable(format!(
                    "no response within {}ms",
                    deadline.as_millis()
                )))
            }),
        None => upstream.fetch(id).await,
    };

    let raw = match fetched {
        Ok(raw) => {
            metrics::counter!("profile_upstream_fetches_total", "result" => "ok").increment(1);
            raw
        }
        Err(err) => {
            metrics::counter!("profile_upstream_fetches_total", "result" => "error").increment(1);
            return Err(err);
        }
    };

    let profile = normalize(&raw)?;
    if profile.id != id {
        return Err(ProfileError::normalization(format!(
            "requested profile {id}, upstream returned {}",
            profile.id
        )));
    }

    let stored = repository.upsert(profile, clock.now()).await?;
    info!(id, last_fetched_at = %stored.last_fetched_at, "Profile refreshed from upstream");

    Ok(stored)
}
