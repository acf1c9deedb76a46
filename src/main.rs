//! # tooldex CLI
//!
//! The `tooldex` binary is the backend for a web tool directory: it owns the
//! listings database, the full-text search index that tracks it, and the
//! periodic hype score recompute that ranks the catalog.
//!
//! ## Usage
//!
//! ```bash
//! tooldex --config ./config/tooldex.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tooldex init` | Create the SQLite database and run schema migrations |
//! | `tooldex import <file>` | Ingest a scraper JSON feed, upserting by slug |
//! | `tooldex rescore` | Recompute every active listing's hype score |
//! | `tooldex search "<query>"` | Full-text search over the catalog |
//! | `tooldex top` | Show the catalog ranked by hype score |
//! | `tooldex upvote <slug>` | Record a community upvote |
//! | `tooldex link <slug>` | Flip a listing's dead-link flag |
//! | `tooldex remove <slug>` | Hard-delete a listing |
//! | `tooldex stats` | Catalog summary |
//!
//! ## Examples
//!
//! ```bash
//! # Initialize the database
//! tooldex init --config ./config/tooldex.toml
//!
//! # Ingest last night's scraper output
//! tooldex import scrapers/output/github-trending.json
//!
//! # Scheduled ranking pass (scheduler supplies the target db)
//! TOOLDEX_DB=/var/lib/tooldex/catalog.sqlite tooldex rescore
//!
//! # Search, most relevant first
//! tooldex search "mcp server"
//!
//! # Search, hottest first
//! tooldex search "agent framework" --rank hype
//! ```

mod config;
mod db;
mod import;
mod link;
mod migrate;
mod models;
mod remove;
mod rescore;
mod score;
mod search;
mod stats;
mod top;
mod upvote;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tooldex CLI — catalog ranking and search backend for an AI/agent/Web3
/// tool directory.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. The `TOOLDEX_DB` environment variable overrides the configured
/// database path, so schedulers can target a database directly.
#[derive(Parser)]
#[command(
    name = "tooldex",
    about = "tooldex — catalog ranking and search backend for a tool directory",
    version,
    long_about = "tooldex stores the listings of a web tool directory in SQLite, keeps an FTS5 \
    search index transactionally consistent with them via triggers, and periodically recomputes \
    a composite hype score from raw popularity signals (stars, downloads, upvotes, freshness)."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/tooldex.toml`. Optional when `TOOLDEX_DB` is set.
    #[arg(long, global = true, default_value = "./config/tooldex.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file, the listings table, the FTS5 search
    /// index, and the triggers that keep the index consistent. This command
    /// is idempotent — running it multiple times is safe. It is also the only
    /// supported way to manage this schema: the index and triggers are
    /// invisible to generic schema-diff tools, which would drop them.
    Init,

    /// Ingest a scraper feed (JSON array of listing entries).
    ///
    /// Upserts by slug inside a single transaction. Refreshes text fields
    /// and raw signals; upvote counts and hype scores are preserved.
    Import {
        /// Path to the feed file.
        file: PathBuf,
    },

    /// Recompute hype scores for all active listings.
    ///
    /// Reads every non-dead listing's raw signals, computes the composite
    /// score, and commits all results in one atomic batch. Safe to re-run;
    /// intended to be invoked periodically by a scheduler. Exits non-zero on
    /// any failure so the scheduler can alert or retry.
    Rescore,

    /// Search the catalog.
    ///
    /// Full-text query against the search index. Results are ranked by text
    /// relevance by default; `--rank hype` re-ranks them by hype score.
    /// Dead-linked listings are never returned.
    Search {
        /// The search query string.
        query: String,

        /// Ranking: `relevance` (bm25) or `hype` (stored hype score).
        #[arg(long, default_value = "relevance")]
        rank: String,

        /// Maximum number of results to return.
        #[arg(long)]
        limit: Option<i64>,
    },

    /// Show the catalog ranked by hype score.
    Top {
        /// Maximum number of listings to show.
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },

    /// Record a community upvote for a listing.
    Upvote {
        /// Listing slug.
        slug: String,
    },

    /// Flip a listing's dead-link flag.
    ///
    /// Dead listings are skipped by the rescore job (their last score stays
    /// frozen) and hidden from search.
    Link {
        /// Listing slug.
        slug: String,

        /// Mark the listing dead.
        #[arg(long, conflicts_with = "alive")]
        dead: bool,

        /// Mark the listing alive again.
        #[arg(long)]
        alive: bool,
    },

    /// Hard-delete a listing.
    ///
    /// Removes the row and, transactionally, its search document.
    Remove {
        /// Listing slug.
        slug: String,
    },

    /// Show catalog statistics.
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Import { file } => {
            import::run_import(&cfg, &file).await?;
        }
        Commands::Rescore => {
            rescore::run_rescore(&cfg).await?;
        }
        Commands::Search { query, rank, limit } => {
            search::run_search(&cfg, &query, &rank, limit).await?;
        }
        Commands::Top { limit } => {
            top::run_top(&cfg, limit).await?;
        }
        Commands::Upvote { slug } => {
            upvote::run_upvote(&cfg, &slug).await?;
        }
        Commands::Link { slug, dead, alive } => {
            if dead == alive {
                anyhow::bail!("Specify exactly one of --dead or --alive");
            }
            link::run_link(&cfg, &slug, dead).await?;
        }
        Commands::Remove { slug } => {
            remove::run_remove(&cfg, &slug).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
    }

    Ok(())
}
