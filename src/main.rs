//! Songweir main entry point
//!
//! Command-line interface for the catalog harvester: forward crawl,
//! reconciliation sweep, and database statistics.

use clap::{Parser, ValueEnum};
use songweir::config::load_config_with_hash;
use songweir::crawler::{ForwardCrawler, Sweeper};
use songweir::storage::{SqliteStorage, Storage};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Songweir: an incremental karaoke catalog harvester
///
/// Songweir walks a paginated remote song catalog page by page, persists
/// extracted records with deduplication, and re-attempts previously failed
/// pages in bounded reconciliation sweeps.
#[derive(Parser, Debug)]
#[command(name = "songweir")]
#[command(version = "1.0.0")]
#[command(about = "An incremental karaoke catalog harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Entry mode: forward crawl or reconciliation sweep
    #[arg(long, value_enum, default_value_t = Mode::Crawl)]
    mode: Mode,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show statistics from the database and exit
    #[arg(long)]
    stats: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Advance the page cursor from the last audited position
    Crawl,
    /// Re-visit quarantined pages in id windows
    Sweep,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, _config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.stats {
        return handle_stats(&config);
    }

    // Open storage once at startup; schema bootstrap happens here and any
    // failure aborts before crawling begins
    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;

    match cli.mode {
        Mode::Crawl => handle_crawl(config, storage).await?,
        Mode::Sweep => handle_sweep(config, storage).await?,
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("songweir=info,warn"),
            1 => EnvFilter::new("songweir=debug,info"),
            2 => EnvFilter::new("songweir=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the forward crawl mode
async fn handle_crawl(
    config: songweir::config::Config,
    storage: SqliteStorage,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut crawler = ForwardCrawler::new(config, storage)?;
    crawler.bootstrap().await?;

    match crawler.run().await {
        Ok(summary) => {
            tracing::info!(
                "Forward crawl finished: {} pages visited, {} songs persisted, {} quarantined",
                summary.pages_visited,
                summary.songs_persisted,
                summary.pages_quarantined
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Forward crawl halted: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the reconciliation sweep mode
async fn handle_sweep(
    config: songweir::config::Config,
    storage: SqliteStorage,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut sweeper = Sweeper::new(config, storage)?;
    sweeper.bootstrap().await?;

    match sweeper.run().await {
        Ok(summary) => {
            tracing::info!(
                "Sweep finished: {} pages re-visited, {} retired, {} songs persisted",
                summary.pages_revisited,
                summary.pages_retired,
                summary.songs_persisted
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Sweep halted: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the --stats mode: shows statistics from the database and exits
fn handle_stats(config: &songweir::config::Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("Database: {}\n", config.output.database_path);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;

    println!("Songs persisted:   {}", storage.count_songs()?);
    println!("Audit log entries: {}", storage.count_log_entries()?);
    println!("Quarantined pages: {}", storage.count_failed_pages()?);

    if let Some(page) = storage.last_logged_page()? {
        println!("Resume cursor:     page {}", page);
    } else {
        println!("Resume cursor:     none (fresh database)");
    }

    let breakdown = storage.outcome_breakdown()?;
    if !breakdown.is_empty() {
        println!("\nOutcomes:");
        let mut entries: Vec<_> = breakdown.into_iter().collect();
        entries.sort_by_key(|(outcome, _)| outcome.to_db_string());
        for (outcome, count) in entries {
            println!("  {:<18} {}", outcome.to_db_string(), count);
        }
    }

    Ok(())
}
