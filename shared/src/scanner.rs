//! Freshness scanner.
//!
//! The core algorithm of the exporter: given a dataset's bin list and the
//! cache contents, decide how much history to re-scan, walk bins newest to
//! oldest querying the product oracle, update the cache, and derive
//! per-product lags and the up-to-date flag.
//!
//! The newest-to-oldest ordering is load-bearing: it lets the walk stop as
//! soon as every product has a timestamp at least as recent as the current
//! bin, because all remaining (older) bins cannot improve on what is already
//! known. Combined with the lookback window, this keeps steady-state cycles
//! from re-querying the oracle for the full bin history.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::cache::{CacheError, FreshnessCache};
use crate::config::{ProductTable, LATEST_BIN_FIELD};
use crate::models::{FreshnessRecord, ProductFreshness, NO_DATA_LAG, NO_DATA_TIMESTAMP};
use crate::source::{BinSource, OracleError, ProductOracle, SourceError};

/// Fatal-class errors aborting a single dataset's scan.
///
/// The cycle driver logs these and proceeds to the next dataset; they never
/// terminate the process.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The bin source failed.
    #[error("bin source failure: {0}")]
    Source(#[from] SourceError),

    /// The product oracle failed with a non-skip error.
    #[error("product oracle failure for bin {pid}: {source}")]
    Oracle {
        /// Bin being queried when the failure occurred.
        pid: String,
        /// The underlying oracle error.
        source: OracleError,
    },

    /// The freshness cache failed.
    #[error("freshness cache failure: {0}")]
    Cache(#[from] CacheError),
}

/// Incremental freshness scanner over a shared cache.
pub struct FreshnessScanner {
    products: ProductTable,
    cache: Arc<dyn FreshnessCache>,
    lookback: Duration,
    lag_threshold: Duration,
}

impl FreshnessScanner {
    /// Creates a scanner for a fixed product table.
    ///
    /// # Arguments
    ///
    /// * `products` - The deployment's product table
    /// * `cache` - Shared freshness cache; the scanner is its only writer
    /// * `lookback` - Maximum age of bins re-scanned once all products are
    ///   cached
    /// * `lag_threshold` - Wall-clock age of the newest bin beyond which the
    ///   dataset counts as stale
    #[must_use]
    pub fn new(
        products: ProductTable,
        cache: Arc<dyn FreshnessCache>,
        lookback: Duration,
        lag_threshold: Duration,
    ) -> Self {
        Self {
            products,
            cache,
            lookback,
            lag_threshold,
        }
    }

    /// The product table this scanner tracks.
    #[must_use]
    pub fn products(&self) -> &ProductTable {
        &self.products
    }

    /// Scans one dataset and returns its freshness record.
    ///
    /// Returns `Ok(None)` when the dataset has no bins at all; the cache is
    /// then set to sentinels so the next cycle still short-circuits
    /// consistently. `now` is the evaluation time for the up-to-date flag,
    /// passed in so tests stay deterministic.
    ///
    /// # Errors
    ///
    /// Returns a [`ScanError`] on bin-source failures, non-skip oracle
    /// failures, or cache failures. The error aborts this dataset's scan
    /// only; the cache keeps its last consistent state and the next cycle
    /// self-heals.
    pub async fn scan(
        &self,
        dataset: &str,
        bins: &dyn BinSource,
        oracle: &dyn ProductOracle,
        now: DateTime<Utc>,
    ) -> Result<Option<FreshnessRecord>, ScanError> {
        let bin_list = bins.list_bins(dataset).await?;
        if bin_list.is_empty() {
            tracing::debug!(dataset, "Dataset has no bins, caching sentinels");
            self.cache_no_data(dataset)?;
            return Ok(None);
        }

        // The list is newest-first, so the head is the freshest observation
        // this cycle. Cached unconditionally: an out-of-order older bin can
        // never appear at the head and downgrade a newer value.
        let latest_bin = bin_list[0].sample_time;
        self.cache.set(dataset, LATEST_BIN_FIELD, latest_bin)?;

        // Seed per-product timestamps from cached non-sentinel values.
        let mut found: BTreeMap<&str, Option<i64>> = BTreeMap::new();
        for spec in &self.products {
            let cached = self.cache.get(dataset, &spec.timestamp_field)?;
            found.insert(
                spec.name.as_str(),
                cached.filter(|&ts| ts != NO_DATA_TIMESTAMP),
            );
        }

        // Once every product has a valid cached timestamp the walk only needs
        // the lookback window; a cold start or cache loss forces a full
        // rebuild over the entire list.
        let all_cached = found.values().all(Option::is_some);
        let lookback_secs = i64::try_from(self.lookback.as_secs()).unwrap_or(i64::MAX);
        let window: Vec<_> = if all_cached {
            let cutoff = now.timestamp().saturating_sub(lookback_secs);
            let recent: Vec<_> = bin_list
                .iter()
                .take_while(|bin| bin.sample_time >= cutoff)
                .collect();
            if recent.is_empty() {
                // A dataset inactive longer than the window still gets a
                // real scan, not an empty slice.
                bin_list.iter().collect()
            } else {
                recent
            }
        } else {
            bin_list.iter().collect()
        };

        for bin in window {
            if let Some(resolved) = resolved_minimum(&found) {
                if bin.sample_time <= resolved {
                    break;
                }
            }

            let flags = match oracle.has_products(&bin.pid).await {
                Ok(flags) => flags,
                Err(err) if err.is_skip() => {
                    tracing::debug!(dataset, pid = %bin.pid, "Bin has no product record");
                    continue;
                }
                Err(source) => {
                    return Err(ScanError::Oracle {
                        pid: bin.pid.clone(),
                        source,
                    });
                }
            };

            for spec in &self.products {
                if !flags.get(&spec.oracle_field).copied().unwrap_or(false) {
                    continue;
                }
                if let Some(entry) = found.get_mut(spec.name.as_str()) {
                    if entry.is_none_or(|ts| bin.sample_time > ts) {
                        *entry = Some(bin.sample_time);
                        self.cache
                            .set(dataset, &spec.timestamp_field, bin.sample_time)?;
                    }
                }
            }
        }

        // Shape the record. Products never observed get sentinels; every
        // field is cached so the next cycle sees the same picture.
        let mut products = BTreeMap::new();
        for spec in &self.products {
            let freshness = match found[spec.name.as_str()] {
                Some(ts) => ProductFreshness {
                    latest_timestamp: ts,
                    lag_seconds: latest_bin - ts,
                },
                None => ProductFreshness::no_data(),
            };
            self.cache
                .set(dataset, &spec.timestamp_field, freshness.latest_timestamp)?;
            self.cache
                .set(dataset, &spec.lag_field, freshness.lag_seconds)?;
            products.insert(spec.name.clone(), freshness);
        }

        let lag_threshold_secs = i64::try_from(self.lag_threshold.as_secs()).unwrap_or(i64::MAX);
        let is_up_to_date = now.timestamp() - latest_bin <= lag_threshold_secs;

        Ok(Some(FreshnessRecord {
            latest_bin_timestamp: latest_bin,
            products,
            is_up_to_date,
        }))
    }

    /// Writes the "no data" sentinels for every field of a dataset.
    fn cache_no_data(&self, dataset: &str) -> Result<(), CacheError> {
        self.cache.set(dataset, LATEST_BIN_FIELD, NO_DATA_TIMESTAMP)?;
        for spec in &self.products {
            self.cache
                .set(dataset, &spec.timestamp_field, NO_DATA_TIMESTAMP)?;
            self.cache.set(dataset, &spec.lag_field, NO_DATA_LAG)?;
        }
        Ok(())
    }
}

/// Running minimum of the product timestamps, once all are resolved.
///
/// Returns `None` while any product is still unresolved: the walk must keep
/// descending because an older bin could still hold that product's newest
/// occurrence.
fn resolved_minimum(found: &BTreeMap<&str, Option<i64>>) -> Option<i64> {
    found
        .values()
        .copied()
        .collect::<Option<Vec<i64>>>()
        .and_then(|timestamps| timestamps.into_iter().min())
}
