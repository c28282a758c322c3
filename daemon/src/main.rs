//! FILETRAIL daemon.
//!
//! Without flags, wires the in-memory stores to an activity feed, starts the
//! watcher, and runs until SIGINT. With `--clear`, bulk-clears both durable
//! collections and exits: 0 on success, 1 on any failure.
//!
//! Usage:
//!   filetraild
//!   filetraild --config filetrail.toml
//!   filetraild --clear

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use filetrail_chain::verify_chain;
use filetrail_contracts::RuntimeConfig;
use filetrail_store::{
    clear_all, BlockStore, MemoryBlockStore, MemoryEventStore, PagedCollection,
};
use filetrail_watch::{ActivityFeed, ActivityWatcher, Backoff};

// ── CLI definition ────────────────────────────────────────────────────────────

/// FILETRAIL: append-only, hash-linked audit log for file activity.
#[derive(Parser)]
#[command(
    name = "filetraild",
    about = "FILETRAIL watcher daemon and maintenance CLI",
    long_about = "Runs the FILETRAIL activity watcher, extending the hash-linked audit\n\
                  chain once per observed file activity event. With --clear, performs\n\
                  the administrative reset of both durable collections instead."
)]
struct Cli {
    /// Bulk-clear the activity log and block chain collections, then exit.
    #[arg(long)]
    clear: bool,

    /// Path to a TOML runtime configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Initialize structured logging. Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match RuntimeConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!(error = %e, "failed to load configuration");
                std::process::exit(1);
            }
        },
        None => RuntimeConfig::default(),
    };

    let events = Arc::new(MemoryEventStore::new());
    let blocks = Arc::new(MemoryBlockStore::new());

    if cli.clear {
        run_clear(events, blocks, &config).await;
        return;
    }

    run_watcher(blocks, &config).await;
}

/// Administrative reset: clear both collections and exit with 0/1.
async fn run_clear(
    events: Arc<MemoryEventStore>,
    blocks: Arc<MemoryBlockStore>,
    config: &RuntimeConfig,
) {
    let collections: Vec<Arc<dyn PagedCollection>> = vec![events, blocks];

    match clear_all(&collections, config.maintenance.page_size).await {
        Ok(deleted) => {
            info!(deleted, "maintenance reset complete");
        }
        Err(e) => {
            error!(error = %e, "maintenance reset failed");
            std::process::exit(1);
        }
    }
}

/// Start the watcher and run until SIGINT.
async fn run_watcher(blocks: Arc<MemoryBlockStore>, config: &RuntimeConfig) {
    let backoff = Backoff {
        initial: Duration::from_millis(config.feed.resubscribe_initial_ms),
        max: Duration::from_millis(config.feed.resubscribe_max_ms),
    };
    let feed = Arc::new(ActivityFeed::new());
    let watcher = Arc::new(ActivityWatcher::with_backoff(blocks.clone(), backoff));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(watcher.run(feed, shutdown_rx));

    info!("watcher running; press Ctrl-C to stop");
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::process::exit(1);
    }

    let _ = shutdown_tx.send(true);
    if let Err(e) = handle.await {
        error!(error = %e, "watcher task failed");
        std::process::exit(1);
    }

    // Final integrity check of whatever was chained during this run.
    match blocks.list_all(true) {
        Ok(chain) => {
            let verification = verify_chain(&chain);
            info!(
                blocks = chain.len(),
                valid = verification.is_valid(),
                "final chain state"
            );
        }
        Err(e) => {
            error!(error = %e, "failed to read chain for final verification");
            std::process::exit(1);
        }
    }
}
