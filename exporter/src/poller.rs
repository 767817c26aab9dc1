//! Polling loop.
//!
//! Runs one scan cycle per interval: list datasets, scan each sequentially,
//! publish the results. Datasets are processed one at a time, which also
//! serializes cache access per dataset. A fatal error in one dataset's scan
//! is logged and never aborts the cycle for the others.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use shared::models::{FreshnessRecord, TimelineMetric};
use shared::scanner::FreshnessScanner;
use shared::sink::MetricsSink;
use shared::source::{BinSource, ProductOracle, TimelineSource};
use tokio::time::interval;

/// Background worker driving freshness scans and timeline updates.
pub struct PollWorker {
    bins: Arc<dyn BinSource>,
    oracle: Arc<dyn ProductOracle>,
    timeline_source: Arc<dyn TimelineSource>,
    scanner: FreshnessScanner,
    sink: Arc<dyn MetricsSink>,
    timeline: Vec<TimelineMetric>,
    interval_duration: Duration,
}

impl PollWorker {
    /// Creates a new poll worker.
    ///
    /// The three source arguments are usually clones of one
    /// [`shared::client::InstrumentApiClient`]; they are separate so tests
    /// can substitute each collaborator independently.
    #[must_use]
    pub fn new(
        bins: Arc<dyn BinSource>,
        oracle: Arc<dyn ProductOracle>,
        timeline_source: Arc<dyn TimelineSource>,
        scanner: FreshnessScanner,
        sink: Arc<dyn MetricsSink>,
        timeline: Vec<TimelineMetric>,
        interval_duration: Duration,
    ) -> Self {
        Self {
            bins,
            oracle,
            timeline_source,
            scanner,
            sink,
            timeline,
            interval_duration,
        }
    }

    /// Runs the polling loop indefinitely.
    pub async fn run(self: Arc<Self>) {
        let mut tick = interval(self.interval_duration);

        loop {
            tick.tick().await;
            self.run_cycle().await;
        }
    }

    /// Runs one full polling cycle over all datasets.
    pub async fn run_cycle(&self) {
        let datasets = match self.bins.list_datasets().await {
            Ok(datasets) => datasets,
            Err(e) => {
                tracing::error!(error = %e, "Failed to list datasets, skipping cycle");
                return;
            }
        };

        tracing::info!(count = datasets.len(), "Starting polling cycle");
        for dataset in &datasets {
            self.process_dataset(dataset).await;
        }
    }

    async fn process_dataset(&self, dataset: &str) {
        for metric in &self.timeline {
            match self.timeline_source.latest_point(&metric.name, dataset).await {
                Ok(Some(point)) => self.sink.publish_timeline(dataset, &metric.name, &point),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(
                        dataset,
                        metric = %metric.name,
                        error = %e,
                        "Failed to fetch latest timeline point"
                    );
                }
            }
        }

        match self
            .scanner
            .scan(dataset, self.bins.as_ref(), self.oracle.as_ref(), Utc::now())
            .await
        {
            Ok(Some(record)) => {
                tracing::info!(
                    dataset,
                    latest_bin_timestamp = record.latest_bin_timestamp,
                    up_to_date = record.is_up_to_date,
                    "Freshness scan complete"
                );
                self.sink.publish(dataset, &record);
            }
            Ok(None) => {
                tracing::info!(dataset, "Dataset has no bins");
                self.sink
                    .publish(dataset, &FreshnessRecord::no_data(self.scanner.products()));
            }
            Err(e) => {
                tracing::error!(dataset, error = %e, "Freshness scan failed");
            }
        }
    }
}
