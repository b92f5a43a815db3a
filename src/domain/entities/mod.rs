//! Core domain entities.
//!
//! - [`UserProfile`] - A cached, normalized profile with its fetch time
//! - [`NewProfile`] - A normalized profile before it is written

pub mod profile;

pub use profile::{NewProfile, UserProfile};
