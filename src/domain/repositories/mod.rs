//! Repository trait definitions for the domain layer.
//!
//! Traits define the storage contract; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`ProfileRepository`] - Cached profile storage

pub mod profile_repository;

pub use profile_repository::ProfileRepository;

#[cfg(test)]
pub use profile_repository::MockProfileRepository;
