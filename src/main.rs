//! Comunicati main entry point
//!
//! Command-line interface for the press-release harvester.

use clap::{Parser, Subcommand};
use comunicati::config::{load_config_or_default, Config};
use comunicati::crawler::{Backfill, Fetcher, ListCrawler};
use comunicati::export::export_csv;
use comunicati::maintenance::{run_audit, run_issuer_migration};
use comunicati::storage::{open_store, Store};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Comunicati: municipal press-release harvester
///
/// Crawls a paginated press-release listing into a SQLite store, then
/// backfills full body text in a separate resumable phase.
#[derive(Parser, Debug)]
#[command(name = "comunicati")]
#[command(about = "Municipal press-release harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the database path from the config
    #[arg(long, value_name = "DB")]
    database: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl listing pages and persist discovered releases
    Crawl {
        /// First page number (zero-indexed)
        #[arg(long, default_value_t = 0)]
        start: u32,

        /// Last page number, inclusive
        #[arg(long)]
        end: u32,
    },

    /// Fetch body text for releases whose content is still missing
    Backfill {
        /// Maximum rows to process this invocation
        #[arg(long)]
        limit: Option<u64>,
    },

    /// Export discovered releases to CSV
    Export {
        /// Output path (defaults to the configured csv-path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check stored content against the expected issuer/date prefix shape
    Audit,

    /// Extract issuers into their own column and strip the content prefix
    MigrateIssuer,

    /// Show store totals
    Stats,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = load_config_or_default(cli.config.as_deref())?;
    if let Some(db) = &cli.database {
        config.output.database_path = db.display().to_string();
    }

    match cli.command {
        Command::Crawl { start, end } => handle_crawl(&config, start, end).await?,
        Command::Backfill { limit } => handle_backfill(&config, limit).await?,
        Command::Export { output } => handle_export(&config, output.as_deref())?,
        Command::Audit => handle_audit(&config)?,
        Command::MigrateIssuer => handle_migrate_issuer(&config)?,
        Command::Stats => handle_stats(&config)?,
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("comunicati=info,warn"),
            1 => EnvFilter::new("comunicati=debug,info"),
            2 => EnvFilter::new("comunicati=trace,debug"),
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

/// Handles the crawl subcommand: list phase over a page range
async fn handle_crawl(
    config: &Config,
    start: u32,
    end: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    if start > end {
        return Err(format!("start page {} is past end page {}", start, end).into());
    }

    let base_url = Url::parse(&config.site.base_url)?;
    let mut store = open_store(Path::new(&config.output.database_path))?;
    let fetcher = Fetcher::new(&config.fetch)?;
    let crawler = ListCrawler::new(
        &fetcher,
        base_url,
        Duration::from_millis(config.crawl.page_delay_ms),
    );

    tracing::info!(
        "Crawling pages {}..={} of {}",
        start,
        end,
        config.site.base_url
    );
    let summary = crawler.run(&mut store, start, end).await?;

    println!(
        "Crawl complete: {} pages visited ({} failed), {} releases discovered, {} new rows",
        summary.pages_visited, summary.pages_failed, summary.records_parsed, summary.rows_inserted
    );

    Ok(())
}

/// Handles the backfill subcommand: content phase over missing rows
async fn handle_backfill(
    config: &Config,
    limit: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(Path::new(&config.output.database_path))?;
    let fetcher = Fetcher::new(&config.fetch)?;
    let backfill = Backfill::new(
        &fetcher,
        config.backfill.batch_size,
        Duration::from_millis(config.backfill.row_delay_ms),
    );

    let missing = store.count_missing_content()?;
    tracing::info!("{} rows still missing content", missing);

    let summary = backfill.run(&mut store, limit).await?;

    println!(
        "Backfill complete: {} rows processed, {} updated, {} without content, {} fetch failures",
        summary.rows_processed,
        summary.rows_updated,
        summary.rows_without_content,
        summary.fetch_failures
    );

    Ok(())
}

/// Handles the export subcommand
fn handle_export(
    config: &Config,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(Path::new(&config.output.database_path))?;
    let default_path = PathBuf::from(&config.output.csv_path);
    let path = output.unwrap_or(&default_path);

    let written = export_csv(&store, path)?;
    println!("Exported {} releases to {}", written, path.display());

    Ok(())
}

/// Handles the audit subcommand
fn handle_audit(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(Path::new(&config.output.database_path))?;
    let report = run_audit(&store)?;

    println!(
        "Audited {} rows: {} violate the issuer/date prefix property",
        report.rows_checked,
        report.violating_ids.len()
    );
    if !report.violating_ids.is_empty() {
        println!("Violating ids: {:?}", report.violating_ids);
    }
    println!(
        "{} unique starting words: {:?}",
        report.starting_words.len(),
        report.starting_words
    );

    Ok(())
}

/// Handles the migrate-issuer subcommand
fn handle_migrate_issuer(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(Path::new(&config.output.database_path))?;
    let summary = run_issuer_migration(&mut store)?;

    println!(
        "Migrated {} rows; {} left intact (no recognized issuer prefix)",
        summary.rows_migrated,
        summary.skipped_ids.len()
    );
    if !summary.skipped_ids.is_empty() {
        println!("Skipped ids: {:?}", summary.skipped_ids);
    }

    Ok(())
}

/// Handles the stats subcommand
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(Path::new(&config.output.database_path))?;

    let total = store.count_total()?;
    let missing = store.count_missing_content()?;

    println!("Database: {}", config.output.database_path);
    println!("Total releases: {}", total);
    println!("With content:   {}", total - missing);
    println!("Missing content: {}", missing);

    Ok(())
}
