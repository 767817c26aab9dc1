//! Binsight CLI
//!
//! Command-line interface for one-shot operations against the instrument
//! API: dataset discovery and ad-hoc freshness scans.
//!
//! # Usage
//!
//! ```bash
//! binsight --help
//! binsight datasets
//! binsight scan santa-cruz --lag-threshold-hours 24
//! ```

#![deny(unsafe_code)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use shared::cache::InMemoryFreshnessCache;
use shared::client::InstrumentApiClient;
use shared::config::ProductTable;
use shared::models::FreshnessRecord;
use shared::scanner::FreshnessScanner;
use shared::source::BinSource;

const SECS_PER_HOUR: u64 = 3600;
const SECS_PER_DAY: u64 = 86_400;

/// Binsight CLI - instrument-data freshness from the command line
#[derive(Parser)]
#[command(name = "binsight")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL for the instrument API
    #[arg(long, env = "BINSIGHT_BASE_URL")]
    base_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the datasets known to the instrument API
    Datasets,
    /// Run one freshness scan for a dataset and print the record as JSON
    Scan {
        /// Dataset to scan
        dataset: String,

        /// Hours the newest bin may lag wall clock before the dataset counts as stale
        #[arg(long, default_value_t = 24)]
        lag_threshold_hours: u64,

        /// Days of bin history re-scanned once all products are cached
        #[arg(long, default_value_t = 14)]
        lookback_days: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let client = InstrumentApiClient::new(cli.base_url)?;

    match cli.command {
        Commands::Datasets => {
            for dataset in client.list_datasets().await? {
                println!("{dataset}");
            }
        }
        Commands::Scan {
            dataset,
            lag_threshold_hours,
            lookback_days,
        } => {
            // A fresh cache makes the one-shot scan a full rebuild.
            let scanner = FreshnessScanner::new(
                ProductTable::default(),
                Arc::new(InMemoryFreshnessCache::new()),
                Duration::from_secs(lookback_days * SECS_PER_DAY),
                Duration::from_secs(lag_threshold_hours * SECS_PER_HOUR),
            );

            let record = scanner.scan(&dataset, &client, &client, Utc::now()).await?;
            let record =
                record.unwrap_or_else(|| FreshnessRecord::no_data(scanner.products()));
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }

    Ok(())
}
