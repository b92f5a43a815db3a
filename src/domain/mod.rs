//! Domain layer: profile entities, the normalization and freshness rules, and
//! the contracts of the storage and upstream collaborators.
//!
//! Nothing in this layer performs I/O directly.
//!
//! # Architecture
//!
//! - [`entities`] - Canonical profile records
//! - [`errors`] - Error taxonomy shared by every layer
//! - [`normalizer`] - Upstream payload to canonical record mapping
//! - [`freshness`] - TTL-based staleness decisions
//! - [`clock`] - Injectable time source
//! - [`repositories`] - Storage trait
//! - [`upstream`] - Upstream source trait

pub mod clock;
pub mod entities;
pub mod errors;
pub mod freshness;
pub mod normalizer;
pub mod repositories;
pub mod upstream;
