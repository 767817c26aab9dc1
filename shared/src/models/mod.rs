//! Data models for bins, freshness records, and timeline metrics.

pub mod bin;
pub mod record;
pub mod timeline;

pub use bin::SampleBin;
pub use record::{FreshnessRecord, ProductFreshness, NO_DATA_LAG, NO_DATA_TIMESTAMP};
pub use timeline::{default_timeline_metrics, TimelineMetric, TimelinePoint};
