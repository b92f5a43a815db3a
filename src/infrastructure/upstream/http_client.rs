//! HTTP client for the upstream profile API.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::domain::errors::{ProfileError, ProfileResult};
use crate::domain::upstream::UpstreamClient;

/// Connection settings for [`HttpUpstreamClient`].
#[derive(Debug, Clone)]
pub struct UpstreamSettings {
    /// Collection endpoint; a profile lives at `{base_url}/{id}`.
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

/// Errors that can occur while building the client.
#[derive(Debug, Error)]
pub enum UpstreamSetupError {
    #[error("upstream base URL cannot carry a path: {0}")]
    InvalidBaseUrl(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Fetches profile payloads from a JSON API such as
/// `https://jsonplaceholder.typicode.com/users`.
///
/// A 404 maps to [`ProfileError::UpstreamNotFound`]; any other failure maps to
/// [`ProfileError::UpstreamUnavailable`]. Requests are never retried.
#[derive(Debug, Clone)]
pub struct HttpUpstreamClient {
    client: Client,
    base_url: Url,
}

impl HttpUpstreamClient {
    /// Builds a client with the configured connect and read timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamSetupError::InvalidBaseUrl`] if the base URL cannot
    /// have path segments appended (e.g. `mailto:`), or
    /// [`UpstreamSetupError::Client`] if the TLS backend fails to initialize.
    pub fn new(settings: UpstreamSettings) -> Result<Self, UpstreamSetupError> {
        if settings.base_url.cannot_be_a_base() {
            return Err(UpstreamSetupError::InvalidBaseUrl(
                settings.base_url.to_string(),
            ));
        }

        let client = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .read_timeout(settings.read_timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url,
        })
    }

    /// Returns the URL of the profile with `id`.
    pub fn profile_url(&self, id: i64) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL accepts path segments.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&id.to_string());
        }
        url
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstreamClient {
    async fn fetch(&self, id: i64) -> ProfileResult<Value> {
        let url = self.profile_url(id);
        debug!(%url, "Fetching profile from upstream");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProfileError::upstream_unavailable(describe(&e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(id, "Upstream has no such profile");
            return Err(ProfileError::UpstreamNotFound { id });
        }
        if !status.is_success() {
            warn!(id, %status, "Upstream returned an error status");
            return Err(ProfileError::upstream_unavailable(format!(
                "upstream returned {status}"
            )));
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_decode() {
                ProfileError::normalization(format!("response body is not JSON: {e}"))
            } else {
                ProfileError::upstream_unavailable(describe(&e))
            }
        })
    }
}

fn describe(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else {
        format!("request failed: {e}")
    }
}
