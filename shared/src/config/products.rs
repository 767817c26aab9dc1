//! Product table configuration.
//!
//! The set of derived product types is configuration, not hard-coded domain
//! knowledge, but fixed for a given deployment. Each product is expanded once
//! into the field names used by the oracle response, the cache, and the
//! emitted gauges, so no key-name string manipulation happens at scan time.

use serde::{Deserialize, Serialize};

/// Cache and gauge field holding the newest bin's sample time.
pub const LATEST_BIN_FIELD: &str = "latest_bin_timestamp";

/// Field names for a single tracked product type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSpec {
    /// Product name, e.g. `blobs`.
    pub name: String,
    /// Boolean field in the oracle response, e.g. `has_blobs`.
    pub oracle_field: String,
    /// Timestamp field in cache and gauges, e.g. `latest_blobs_timestamp`.
    pub timestamp_field: String,
    /// Lag field in cache and gauges, e.g. `latest_blobs_lag_seconds`.
    pub lag_field: String,
}

impl ProductSpec {
    /// Expands a product name into its full field set.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            oracle_field: format!("has_{name}"),
            timestamp_field: format!("latest_{name}_timestamp"),
            lag_field: format!("latest_{name}_lag_seconds"),
            name,
        }
    }
}

/// The fixed set of product types tracked by a deployment.
///
/// Built once at configuration time; iteration order is the declaration
/// order, which is also the order gauges are registered in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTable {
    specs: Vec<ProductSpec>,
}

impl ProductTable {
    /// Builds a product table from product names.
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            specs: names.into_iter().map(ProductSpec::new).collect(),
        }
    }

    /// Iterates over the product specs in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, ProductSpec> {
        self.specs.iter()
    }

    /// Number of tracked products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Returns true if no products are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Looks up a spec by product name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ProductSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }
}

impl Default for ProductTable {
    /// The standard deployment set: blobs, features, class scores.
    fn default() -> Self {
        Self::from_names(["blobs", "features", "class_scores"])
    }
}

impl<'a> IntoIterator for &'a ProductTable {
    type Item = &'a ProductSpec;
    type IntoIter = std::slice::Iter<'a, ProductSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_spec_field_expansion() {
        let spec = ProductSpec::new("blobs");
        assert_eq!(spec.name, "blobs");
        assert_eq!(spec.oracle_field, "has_blobs");
        assert_eq!(spec.timestamp_field, "latest_blobs_timestamp");
        assert_eq!(spec.lag_field, "latest_blobs_lag_seconds");
    }

    #[test]
    fn test_default_table() {
        let table = ProductTable::default();
        assert_eq!(table.len(), 3);
        assert!(table.get("class_scores").is_some());
        assert!(table.get("unknown").is_none());
    }

    #[test]
    fn test_from_names_preserves_order() {
        let table = ProductTable::from_names(["features", "blobs"]);
        let names: Vec<&str> = table.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["features", "blobs"]);
    }
}
