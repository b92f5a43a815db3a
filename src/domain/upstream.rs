//! Upstream profile source contract.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::errors::ProfileResult;

/// Fetches raw profile payloads from the upstream source of truth.
///
/// Implementations apply their own connect and read timeouts and never
/// retry: one failed attempt is reported immediately.
///
/// # Implementations
///
/// - [`crate::infrastructure::upstream::HttpUpstreamClient`] - JSON over HTTP via reqwest
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Fetches the raw payload for `id`.
    ///
    /// # Errors
    ///
    /// - [`crate::domain::errors::ProfileError::UpstreamNotFound`] if upstream reports the id does not exist
    /// - [`crate::domain::errors::ProfileError::UpstreamUnavailable`] on transport failure or any other
    ///   non-success response
    /// - [`crate::domain::errors::ProfileError::Normalization`] if a success response is not JSON
    async fn fetch(&self, id: i64) -> ProfileResult<Value>;
}
