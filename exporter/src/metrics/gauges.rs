//! Prometheus gauge definitions.
//!
//! One gauge family per freshness field plus a value/timestamp pair per
//! timeline metric, all labeled by dataset. The set of families is derived
//! from the product table and timeline list at startup, so a deployment
//! tracking different products gets matching gauges without code changes.

use std::collections::HashMap;

use prometheus::{Encoder, GaugeVec, IntGaugeVec, Opts, Registry, TextEncoder};
use shared::config::ProductTable;
use shared::models::{FreshnessRecord, TimelineMetric, TimelinePoint};
use shared::sink::MetricsSink;

const DATASET_LABEL: &[&str] = &["dataset"];

/// Container for all exporter gauges, backed by its own registry.
pub struct ExporterMetrics {
    registry: Registry,
    latest_bin_timestamp: IntGaugeVec,
    up_to_date: IntGaugeVec,
    product_timestamps: HashMap<String, IntGaugeVec>,
    product_lags: HashMap<String, IntGaugeVec>,
    timeline_values: HashMap<String, GaugeVec>,
    timeline_timestamps: HashMap<String, IntGaugeVec>,
}

impl ExporterMetrics {
    /// Creates and registers all gauge families.
    ///
    /// # Errors
    ///
    /// Returns an error if a gauge cannot be registered (e.g. duplicate
    /// product names in the table).
    pub fn new(
        products: &ProductTable,
        timeline: &[TimelineMetric],
    ) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let latest_bin_timestamp = register_int_gauge(
            &registry,
            "ifcb_latest_bin_timestamp",
            "Sample time of the newest bin for dataset (Unix seconds), or 0 if none exist",
        )?;

        let up_to_date = register_int_gauge(
            &registry,
            "ifcb_is_dataset_up_to_date",
            "Whether the dataset's newest bin is within the lag threshold (1) or lagging (0)",
        )?;

        let mut product_timestamps = HashMap::new();
        let mut product_lags = HashMap::new();
        for spec in products {
            product_timestamps.insert(
                spec.name.clone(),
                register_int_gauge(
                    &registry,
                    &format!("ifcb_{}", spec.timestamp_field),
                    &format!(
                        "Sample time of the newest bin with {} for dataset (Unix seconds), or 0 if none exist",
                        spec.name
                    ),
                )?,
            );
            product_lags.insert(
                spec.name.clone(),
                register_int_gauge(
                    &registry,
                    &format!("ifcb_{}", spec.lag_field),
                    &format!(
                        "Seconds between the newest bin and the newest {} for dataset, or -1 if none exist",
                        spec.name
                    ),
                )?,
            );
        }

        let mut timeline_values = HashMap::new();
        let mut timeline_timestamps = HashMap::new();
        for metric in timeline {
            let value = GaugeVec::new(
                Opts::new(
                    format!("ifcb_{}_value", metric.name),
                    format!("Latest {} in {}", metric.name, metric.unit),
                ),
                DATASET_LABEL,
            )?;
            registry.register(Box::new(value.clone()))?;
            timeline_values.insert(metric.name.clone(), value);

            timeline_timestamps.insert(
                metric.name.clone(),
                register_int_gauge(
                    &registry,
                    &format!("ifcb_{}_timestamp", metric.name),
                    &format!("Timestamp of latest {} value (Unix seconds)", metric.name),
                )?,
            );
        }

        Ok(Self {
            registry,
            latest_bin_timestamp,
            up_to_date,
            product_timestamps,
            product_lags,
            timeline_values,
            timeline_timestamps,
        })
    }

    /// Encodes the registry in Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| prometheus::Error::Msg(format!("metrics are not valid UTF-8: {e}")))
    }
}

impl MetricsSink for ExporterMetrics {
    fn publish(&self, dataset: &str, record: &FreshnessRecord) {
        self.latest_bin_timestamp
            .with_label_values(&[dataset])
            .set(record.latest_bin_timestamp);
        self.up_to_date
            .with_label_values(&[dataset])
            .set(i64::from(record.is_up_to_date));

        for (name, freshness) in &record.products {
            if let Some(gauge) = self.product_timestamps.get(name) {
                gauge
                    .with_label_values(&[dataset])
                    .set(freshness.latest_timestamp);
            }
            if let Some(gauge) = self.product_lags.get(name) {
                gauge.with_label_values(&[dataset]).set(freshness.lag_seconds);
            }
        }
    }

    fn publish_timeline(&self, dataset: &str, metric: &str, point: &TimelinePoint) {
        if let Some(gauge) = self.timeline_values.get(metric) {
            gauge.with_label_values(&[dataset]).set(point.value);
        }
        if let Some(gauge) = self.timeline_timestamps.get(metric) {
            gauge.with_label_values(&[dataset]).set(point.timestamp);
        }
    }
}

fn register_int_gauge(
    registry: &Registry,
    name: &str,
    help: &str,
) -> Result<IntGaugeVec, prometheus::Error> {
    let gauge = IntGaugeVec::new(Opts::new(name, help), DATASET_LABEL)?;
    registry.register(Box::new(gauge.clone()))?;
    Ok(gauge)
}
