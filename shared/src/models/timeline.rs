//! Timeline metric model.
//!
//! Timeline metrics are per-bin time series the instrument API exposes
//! alongside the derived products (sample volume, housing temperature, and so
//! on). The exporter republishes the latest point of each as a gauge pair.

use serde::{Deserialize, Serialize};

/// A named per-bin time series with its unit of measure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineMetric {
    /// Metric name as used in the instrument API's time-series endpoint.
    pub name: String,
    /// Human-readable unit, used in gauge help text.
    pub unit: String,
}

impl TimelineMetric {
    /// Creates a new timeline metric descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
        }
    }
}

/// The latest observed point of a timeline metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    /// The most recent value.
    pub value: f64,
    /// Sample time of that value, as Unix seconds.
    pub timestamp: i64,
}

/// The timeline metrics tracked by a standard deployment.
#[must_use]
pub fn default_timeline_metrics() -> Vec<TimelineMetric> {
    [
        ("size", "Bytes"),
        ("temperature", "Degrees C"),
        ("humidity", "Percentage"),
        ("run_time", "Seconds"),
        ("look_time", "Seconds"),
        ("ml_analyzed", "Milliliters"),
        ("concentration", "ROIs / ml"),
        ("n_triggers", "Count"),
        ("n_images", "Count"),
    ]
    .into_iter()
    .map(|(name, unit)| TimelineMetric::new(name, unit))
    .collect()
}
