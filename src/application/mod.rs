//! Application layer services implementing business logic.
//!
//! Services orchestrate domain rules and infrastructure collaborators behind a
//! small API consumed by HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::profile_service::ProfileService`] - Cached profile lookup, refresh and listing

pub mod services;
