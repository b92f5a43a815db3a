//! Error taxonomy of the profile cache.

/// Errors produced by the profile cache core.
///
/// `Clone` so that callers coalesced onto one refresh can all receive its
/// outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    /// No cached record and upstream has none either.
    #[error("profile {id} not found")]
    NotFound { id: i64 },

    /// Upstream reported that the id does not exist.
    #[error("upstream has no profile {id}")]
    UpstreamNotFound { id: i64 },

    /// Transport failure, timeout, or a non-success response other than 404.
    #[error("upstream unavailable: {reason}")]
    UpstreamUnavailable { reason: String },

    /// Upstream payload is missing required fields or is malformed.
    #[error("malformed upstream payload: {reason}")]
    Normalization { reason: String },

    /// Persistence failure on read or write.
    #[error("store error: {reason}")]
    Store { reason: String },
}

impl ProfileError {
    pub fn upstream_unavailable(reason: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            reason: reason.into(),
        }
    }

    pub fn normalization(reason: impl Into<String>) -> Self {
        Self::Normalization {
            reason: reason.into(),
        }
    }

    pub fn store(reason: impl Into<String>) -> Self {
        Self::Store {
            reason: reason.into(),
        }
    }
}

/// Result type for profile cache operations.
pub type ProfileResult<T> = Result<T, ProfileError>;
