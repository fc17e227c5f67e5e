//! CLI administration tool for link-shortener.
//!
//! Runs the shortening core directly against the configured store, without
//! going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL
//! cargo run --bin admin -- shorten https://example.com
//!
//! # Look up a short code
//! cargo run --bin admin -- resolve abc123
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see [`link_shortener::config`].

use link_shortener::application::services::LinkService;
use link_shortener::config;
use link_shortener::domain::entities::ShortenOutcome;
use link_shortener::domain::repositories::LinkRepository;
use link_shortener::server::{Store, open_store};
use link_shortener::utils::code_generator::is_well_formed_code;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;

/// CLI tool for managing link-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Shorten a long URL
    Shorten {
        /// The absolute URL to shorten
        url: String,
    },

    /// Show the long URL behind a short code
    Resolve {
        /// The short code
        code: String,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
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

    let config = config::load_from_env()?;
    let store = open_store(&config).await?;
    let service = LinkService::new(store.repository.clone());

    let result = match cli.command {
        Commands::Shorten { url } => handle_shorten(&service, &url).await,
        Commands::Resolve { code } => handle_resolve(&service, &code).await,
        Commands::Stats => handle_stats(&service).await,
        Commands::Db { action } => handle_db_action(action, &service, &store).await,
    };

    store.close().await;

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

/// Shortens a URL and prints the resulting code.
async fn handle_shorten(service: &LinkService<dyn LinkRepository>, url: &str) -> Result<()> {
    match service.shorten(url).await? {
        ShortenOutcome::Created(link) => {
            println!("{}", "Short link created".green().bold());
            println!("  Code:     {}", link.code.bright_yellow().bold());
            println!("  Long URL: {}", link.long_url.cyan());
        }
        ShortenOutcome::Existing(link) => {
            println!("{}", "URL already shortened".yellow());
            println!("  Code:     {}", link.code.bright_yellow().bold());
            println!(
                "  Created:  {}",
                link.created_at.to_rfc3339().bright_black()
            );
        }
    }

    Ok(())
}

/// Prints the long URL stored under a code.
async fn handle_resolve(service: &LinkService<dyn LinkRepository>, code: &str) -> Result<()> {
    if !is_well_formed_code(code) {
        anyhow::bail!("'{}' is not a short code (6 characters from A-Z a-z 0-9 - _)", code);
    }

    let link = service.resolve(code).await?;

    println!("  {} -> {}", link.code.bright_yellow(), link.long_url.cyan());
    println!(
        "  Created: {}",
        link.created_at.to_rfc3339().bright_black()
    );

    Ok(())
}

/// Displays the number of stored links.
async fn handle_stats(service: &LinkService<dyn LinkRepository>) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let links_count = service.count_links().await?;

    println!(
        "  Links: {}",
        links_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(
    action: DbAction,
    service: &LinkService<dyn LinkRepository>,
    store: &Store,
) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            service.check_store().await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            match &store.pool {
                Some(pool) => {
                    let version: String = sqlx::query_scalar("SELECT version()")
                        .fetch_one(pool)
                        .await?;

                    println!("  PostgreSQL: {}", version.bright_white());
                }
                None => println!("  {}", "In-memory store (not persisted)".bright_white()),
            }
            println!();
        }
    }

    Ok(())
}
