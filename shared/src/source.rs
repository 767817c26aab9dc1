//! Collaborator traits for the freshness scanner.
//!
//! The scanner consumes a list of time-ordered bins for a dataset and a
//! "does bin B have product P" lookup; concrete transport lives behind these
//! traits. The error taxonomy distinguishes skip-class oracle failures (the
//! bin legitimately has no product record; the scan continues with older
//! bins) from fatal-class failures (abort the current dataset's scan only).

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{SampleBin, TimelinePoint};

/// Errors from bin-source and timeline-source calls. Always fatal-class for
/// the current dataset's scan.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Transport-level failure reaching the instrument API.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a body we could not interpret.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// A sample time that does not match the wire format. Treated as an
    /// invariant violation and surfaced loudly.
    #[error("malformed sample time {value:?}: {reason}")]
    InvalidTimestamp {
        /// The offending raw value.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },
}

/// Errors from product-oracle calls.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The bin has no product record at all. Expected during normal
    /// operation; the scan swallows it and continues with older bins.
    #[error("no product record for bin")]
    NoProducts,

    /// Transport-level failure reaching the instrument API. Fatal-class.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a body we could not interpret. Fatal-class.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl OracleError {
    /// Returns true for skip-class errors the scan continues through.
    #[must_use]
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::NoProducts)
    }
}

/// Source of datasets and their bin lists.
#[async_trait]
pub trait BinSource: Send + Sync {
    /// Lists the datasets known to the instrument API.
    ///
    /// # Errors
    ///
    /// Returns an error if the API is unreachable or the response is
    /// malformed.
    async fn list_datasets(&self) -> Result<Vec<String>, SourceError>;

    /// Lists a dataset's bins, ordered by sample time descending (newest
    /// first).
    ///
    /// # Errors
    ///
    /// Returns an error if the API is unreachable, the dataset is invalid,
    /// or the response is malformed.
    async fn list_bins(&self, dataset: &str) -> Result<Vec<SampleBin>, SourceError>;
}

/// Lookup for which derived products exist on a bin.
#[async_trait]
pub trait ProductOracle: Send + Sync {
    /// Returns the oracle's boolean flags for a bin, keyed by oracle field
    /// name (e.g. `has_blobs`).
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::NoProducts`] when the bin legitimately has no
    /// product record, and a fatal-class error otherwise.
    async fn has_products(&self, pid: &str) -> Result<HashMap<String, bool>, OracleError>;
}

/// Source of latest timeline-metric points.
#[async_trait]
pub trait TimelineSource: Send + Sync {
    /// Returns the most recent point of a timeline metric for a dataset, or
    /// `None` when the series is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the API is unreachable or the response is
    /// malformed.
    async fn latest_point(
        &self,
        metric: &str,
        dataset: &str,
    ) -> Result<Option<TimelinePoint>, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_products_is_skip_class() {
        assert!(OracleError::NoProducts.is_skip());
        assert!(!OracleError::Decode("bad body".into()).is_skip());
    }

    #[test]
    fn test_error_display() {
        let err = SourceError::InvalidTimestamp {
            value: "not-a-date".into(),
            reason: "input contains invalid characters".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("not-a-date"));
        assert!(msg.contains("invalid characters"));
    }
}
