//! CLI administration tool for profile-cache.
//!
//! Inspects and refreshes the profile cache without going through the HTTP
//! API. Uses the same configuration as the server.
//!
//! # Usage
//!
//! ```bash
//! # List cached profiles
//! cargo run --bin admin -- profiles list
//!
//! # Ids older than 5 minutes
//! cargo run --bin admin -- profiles stale --ttl-seconds 300
//!
//! # Refetch one profile from upstream
//! cargo run --bin admin -- profiles refresh 1
//!
//! # Refetch every stale profile without prompting
//! cargo run --bin admin -- profiles refresh-stale -y
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see `profile_cache::config`.

use profile_cache::application::services::ProfileService;
use profile_cache::config::{self, Config};
use profile_cache::server::{build_service, connect_pool};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::time::Duration;

/// CLI tool for managing profile-cache.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Inspect and refresh cached profiles
    Profiles {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Profile subcommands.
#[derive(Subcommand)]
enum ProfileAction {
    /// List all cached profiles
    List,

    /// Count cached profiles
    Count,

    /// List ids of profiles older than the TTL
    Stale {
        /// TTL override in seconds (defaults to CACHE_TTL_SECONDS)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        ttl_seconds: Option<u64>,
    },

    /// Refetch one profile from upstream
    Refresh {
        /// Profile id
        id: i64,
    },

    /// Refetch every stale profile from upstream
    RefreshStale {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;
    let pool = connect_pool(&config).await?;

    match cli.command {
        Commands::Profiles { action } => handle_profile_action(action, &config, pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches profile commands.
async fn handle_profile_action(action: ProfileAction, config: &Config, pool: PgPool) -> Result<()> {
    let service = build_service(config, pool)?;

    match action {
        ProfileAction::List => list_profiles(&service).await?,
        ProfileAction::Count => {
            let count = service.count().await?;
            println!(
                "  Cached profiles: {}",
                count.to_string().bright_green().bold()
            );
        }
        ProfileAction::Stale { ttl_seconds } => {
            list_stale(&service, ttl_seconds.map(Duration::from_secs)).await?
        }
        ProfileAction::Refresh { id } => refresh_one(&service, id).await?,
        ProfileAction::RefreshStale { yes } => refresh_stale(&service, yes).await?,
    }

    Ok(())
}

/// Lists cached profiles.
///
/// # Output Format
///
/// ```text
/// 📋 Cached Profiles
///
///   ID   Username         Name                     Company               Fetched
///   ──────────────────────────────────────────────────────────────────────────────────
///   1    Bret             Leanne Graham            Romaguera-Crona       2025-10-02 23:47
/// ```
async fn list_profiles(service: &ProfileService) -> Result<()> {
    println!("{}", "📋 Cached Profiles".bright_blue().bold());
    println!();

    let profiles = service.list_all().await?;

    if profiles.is_empty() {
        println!("{}", "  No profiles cached yet".yellow());
        return Ok(());
    }

    println!(
        "  {:<4} {:<16} {:<24} {:<21} {}",
        "ID".bright_white().bold(),
        "Username".bright_white().bold(),
        "Name".bright_white().bold(),
        "Company".bright_white().bold(),
        "Fetched".bright_white().bold()
    );
    println!("  {}", "─".repeat(84).bright_black());

    for profile in &profiles {
        println!(
            "  {:<4} {:<16} {:<24} {:<21} {}",
            profile.id.to_string().bright_black(),
            profile.username.cyan(),
            profile.name,
            profile.company_name,
            profile
                .last_fetched_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!(
        "  Total: {}",
        profiles.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn list_stale(service: &ProfileService, ttl: Option<Duration>) -> Result<()> {
    let ttl = ttl.unwrap_or_else(|| service.ttl());
    println!(
        "{}",
        format!("⏳ Profiles older than {}s", ttl.as_secs())
            .bright_blue()
            .bold()
    );
    println!();

    let ids = service.list_stale(Some(ttl)).await?;

    if ids.is_empty() {
        println!("{}", "  Everything is fresh".green());
    } else {
        for id in &ids {
            println!("  {}", id.to_string().yellow());
        }
        println!();
        println!("  Total: {}", ids.len().to_string().bright_white().bold());
    }
    println!();

    Ok(())
}

async fn refresh_one(service: &ProfileService, id: i64) -> Result<()> {
    println!(
        "{}",
        format!("🔄 Refreshing profile {id}").bright_blue().bold()
    );

    let profile = service
        .refresh(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to refresh profile {}: {}", id, e))?;

    println!("{}", "✅ Profile refreshed".green().bold());
    println!("  Name:     {}", profile.name.cyan());
    println!("  Username: {}", profile.username.cyan());
    println!("  Website:  {}", profile.website);
    println!("  Company:  {}", profile.company_name);
    println!();

    Ok(())
}

/// Refetches every stale profile, one at a time.
///
/// Failures are reported per id and do not stop the run.
async fn refresh_stale(service: &ProfileService, skip_confirm: bool) -> Result<()> {
    println!("{}", "🔄 Refresh Stale Profiles".bright_blue().bold());
    println!();

    let ids = service.list_stale(None).await?;

    if ids.is_empty() {
        println!("{}", "  Everything is fresh".green());
        return Ok(());
    }

    println!(
        "  {} stale profile(s) older than {}s",
        ids.len().to_string().yellow().bold(),
        service.ttl().as_secs()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Refetch them from upstream?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let mut failed = 0usize;
    for id in &ids {
        match service.refresh(*id).await {
            Ok(_) => println!("  {} {}", "✔".green(), id),
            Err(e) => {
                failed += 1;
                println!("  {} {} {}", "✘".red(), id, e.to_string().bright_black());
            }
        }
    }

    println!();
    if failed == 0 {
        println!("{}", "✅ All stale profiles refreshed".green().bold());
    } else {
        println!(
            "{}",
            format!("⚠️  {failed} of {} refreshes failed", ids.len())
                .yellow()
                .bold()
        );
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let profiles: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_profiles")
                .fetch_one(pool)
                .await
                .context("user_profiles table missing; start the server once to migrate")?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Profiles:   {}", profiles.to_string().bright_green().bold());
            println!();
        }
    }

    Ok(())
}
