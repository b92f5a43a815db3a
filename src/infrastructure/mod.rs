//! Infrastructure layer for external integrations.
//!
//! This layer implements the interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - Profile storage (PostgreSQL and in-memory)
//! - [`upstream`] - HTTP client for the upstream profile API

pub mod persistence;
pub mod upstream;
