//! Shared building blocks with no domain knowledge.
//!
//! - [`single_flight`] - Per-key coalescing of concurrent async work

pub mod single_flight;
