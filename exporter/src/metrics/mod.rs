//! Prometheus gauge registry for the exporter.
//!
//! This module is the concrete metrics sink: it owns the gauge families the
//! poll loop publishes into and renders them for the `/metrics` endpoint.

pub mod gauges;

pub use gauges::ExporterMetrics;
