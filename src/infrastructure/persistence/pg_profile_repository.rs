//! PostgreSQL implementation of profile repository.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::domain::entities::{NewProfile, UserProfile};
use crate::domain::errors::ProfileResult;
use crate::domain::repositories::ProfileRepository;

/// Row shape of the `user_profiles` table.
#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    id: i64,
    name: String,
    username: String,
    email: String,
    website: String,
    company_name: String,
    last_fetched_at: DateTime<Utc>,
}

impl From<ProfileRow> for UserProfile {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            username: row.username,
            email: row.email,
            website: row.website,
            company_name: row.company_name,
            last_fetched_at: row.last_fetched_at,
        }
    }
}

/// PostgreSQL repository for cached profiles.
///
/// Upserts are a single `INSERT ... ON CONFLICT DO UPDATE` statement, so the
/// row lock taken by PostgreSQL serializes concurrent writers of the same id
/// while writers of different ids proceed in parallel.
pub struct PgProfileRepository {
    pool: Arc<PgPool>,
}

impl PgProfileRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn get(&self, id: i64) -> ProfileResult<Option<UserProfile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, name, username, email, website, company_name, last_fetched_at
            FROM user_profiles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UserProfile::from))
    }

    async fn upsert(
        &self,
        profile: NewProfile,
        fetched_at: DateTime<Utc>,
    ) -> ProfileResult<UserProfile> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO user_profiles
                (id, name, username, email, website, company_name, last_fetched_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                username = EXCLUDED.username,
                email = EXCLUDED.email,
                website = EXCLUDED.website,
                company_name = EXCLUDED.company_name,
                last_fetched_at = GREATEST(user_profiles.last_fetched_at, EXCLUDED.last_fetched_at)
            RETURNING id, name, username, email, website, company_name, last_fetched_at
            "#,
        )
        .bind(profile.id)
        .bind(&profile.name)
        .bind(&profile.username)
        .bind(&profile.email)
        .bind(&profile.website)
        .bind(&profile.company_name)
        .bind(fetched_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        debug!(id = row.id, "Profile upserted");

        Ok(row.into())
    }

    async fn count(&self) -> ProfileResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_profiles")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn all(&self) -> ProfileResult<Vec<UserProfile>> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, name, username, email, website, company_name, last_fetched_at
            FROM user_profiles
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(UserProfile::from).collect())
    }

    async fn list_stale(&self, ttl: Duration, now: DateTime<Utc>) -> ProfileResult<Vec<i64>> {
        // A TTL too large for chrono means nothing can be stale.
        let Some(cutoff) = TimeDelta::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_sub_signed(ttl))
        else {
            return Ok(Vec::new());
        };

        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM user_profiles WHERE last_fetched_at < $1 ORDER BY id",
        )
        .bind(cutoff)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(ids)
    }

    async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(self.pool.as_ref())
            .await
            .is_ok()
    }
}
