//! Profile repository implementations.
//!
//! # Repositories
//!
//! - [`PgProfileRepository`] - PostgreSQL storage via SQLx
//! - [`MemoryProfileRepository`] - In-process storage for tests and local runs

pub mod memory_profile_repository;
pub mod pg_profile_repository;

pub use memory_profile_repository::MemoryProfileRepository;
pub use pg_profile_repository::PgProfileRepository;

use crate::domain::errors::ProfileError;

impl From<sqlx::Error> for ProfileError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return ProfileError::store(format!(
                "unique constraint violation on {}",
                db.constraint().unwrap_or("unknown constraint")
            ));
        }

        ProfileError::store(e.to_string())
    }
}
