//! REST API layer for HTTP request/response handling.
//!
//! This layer translates HTTP requests into [`ProfileService`] calls and
//! formats responses. It holds no caching policy of its own.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Request tracing
//! - [`routes`] - Route configuration and composition
//!
//! [`ProfileService`]: crate::application::services::ProfileService

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
