//! Metrics sink trait.
//!
//! The scanner's output is handed to a sink that republishes it as labeled
//! gauges. Publishing is one-way and assumed to always succeed at this
//! layer; the exposition format lives with the implementation.

use crate::models::{FreshnessRecord, TimelinePoint};

/// Receiver for scan results and timeline points.
pub trait MetricsSink: Send + Sync {
    /// Republishes a dataset's freshness record.
    fn publish(&self, dataset: &str, record: &FreshnessRecord);

    /// Republishes the latest point of a timeline metric for a dataset.
    fn publish_timeline(&self, dataset: &str, metric: &str, point: &TimelinePoint);
}
