//! Freshness record model.
//!
//! The output of a freshness scan: per-dataset timestamps and lags for each
//! tracked product type, plus a staleness flag. Every field always carries a
//! defined value; sentinels stand in when no data has ever been observed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::ProductTable;

/// Sentinel timestamp meaning "no occurrence found in any scan to date".
pub const NO_DATA_TIMESTAMP: i64 = 0;

/// Sentinel lag meaning "no occurrence found in any scan to date".
///
/// Distinct from `0`, which means zero lag (the product is current).
pub const NO_DATA_LAG: i64 = -1;

/// Freshness of a single product type within a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFreshness {
    /// Sample time of the most recent bin carrying this product, or
    /// [`NO_DATA_TIMESTAMP`].
    pub latest_timestamp: i64,
    /// `latest_bin_timestamp - latest_timestamp` in seconds, or
    /// [`NO_DATA_LAG`].
    pub lag_seconds: i64,
}

impl ProductFreshness {
    /// The "never observed" sentinel pair.
    #[must_use]
    pub fn no_data() -> Self {
        Self {
            latest_timestamp: NO_DATA_TIMESTAMP,
            lag_seconds: NO_DATA_LAG,
        }
    }

    /// Returns true if this product has been observed at least once.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.latest_timestamp != NO_DATA_TIMESTAMP
    }
}

/// Complete freshness picture for one dataset, as produced by a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreshnessRecord {
    /// Sample time of the newest bin in the dataset, or
    /// [`NO_DATA_TIMESTAMP`] when the dataset has no bins.
    pub latest_bin_timestamp: i64,
    /// Per-product freshness, keyed by product name.
    pub products: BTreeMap<String, ProductFreshness>,
    /// Whether the newest bin is recent enough relative to wall clock.
    pub is_up_to_date: bool,
}

impl FreshnessRecord {
    /// Builds the all-sentinel record for a dataset with no data.
    ///
    /// Used both when a dataset's bin list is empty and when seeding gauges
    /// before the first successful scan.
    #[must_use]
    pub fn no_data(products: &ProductTable) -> Self {
        Self {
            latest_bin_timestamp: NO_DATA_TIMESTAMP,
            products: products
                .iter()
                .map(|spec| (spec.name.clone(), ProductFreshness::no_data()))
                .collect(),
            is_up_to_date: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_freshness_no_data() {
        let p = ProductFreshness::no_data();
        assert_eq!(p.latest_timestamp, NO_DATA_TIMESTAMP);
        assert_eq!(p.lag_seconds, NO_DATA_LAG);
        assert!(!p.has_data());
    }

    #[test]
    fn test_no_data_record_covers_all_products() {
        let table = ProductTable::default();
        let record = FreshnessRecord::no_data(&table);

        assert_eq!(record.latest_bin_timestamp, NO_DATA_TIMESTAMP);
        assert!(!record.is_up_to_date);
        assert_eq!(record.products.len(), table.len());
        for spec in table.iter() {
            assert_eq!(record.products[&spec.name], ProductFreshness::no_data());
        }
    }

    #[test]
    fn test_freshness_record_serialization() {
        let table = ProductTable::default();
        let record = FreshnessRecord::no_data(&table);

        let json = serde_json::to_string(&record).unwrap();
        let back: FreshnessRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
