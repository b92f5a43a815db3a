//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod profiles;

pub use health::health_handler;
pub use profiles::{
    count_profiles_handler, get_profile_handler, list_profiles_handler, refresh_profile_handler,
    stale_profiles_handler,
};
