//! Upstream profile source implementations.
//!
//! - [`HttpUpstreamClient`] - Fetches profiles as JSON over HTTP

mod http_client;

pub use http_client::{HttpUpstreamClient, UpstreamSettings, UpstreamSetupError};
