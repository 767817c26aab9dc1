//! Application state module.
//!
//! Defines the shared application state that is passed to route handlers.

use std::sync::Arc;

use crate::metrics::ExporterMetrics;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The gauge registry rendered by the `/metrics` endpoint.
    metrics: Arc<ExporterMetrics>,
}

impl AppState {
    /// Creates a new application state around the gauge registry.
    #[must_use]
    pub fn new(metrics: Arc<ExporterMetrics>) -> Self {
        Self { metrics }
    }

    /// Returns a reference to the gauge registry.
    #[must_use]
    pub fn metrics(&self) -> &ExporterMetrics {
        self.metrics.as_ref()
    }
}
