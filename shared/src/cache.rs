//! Freshness cache trait and in-memory implementation.
//!
//! The cache holds per-(dataset, field) last-known-good values across polling
//! cycles. It is the scanner's only persistent state: read at the start of
//! each scan to seed the result and decide the required scan depth, written
//! as newer values are discovered. There is no eviction; the key space is
//! bounded in practice by the number of datasets times the fixed field count.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Failed to acquire lock on the cache.
    #[error("Failed to acquire lock on freshness cache")]
    LockError,
}

/// Trait for freshness cache implementations.
///
/// Implementations must be thread-safe (Send + Sync), but callers must
/// serialize access per dataset: no two scans may concurrently
/// read-modify-write the same `(dataset, field)` key. Keys of distinct
/// datasets are disjoint, so no cross-dataset synchronization is needed.
pub trait FreshnessCache: Send + Sync {
    /// Returns the cached value for `(dataset, field)`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache cannot be read.
    fn get(&self, dataset: &str, field: &str) -> Result<Option<i64>, CacheError>;

    /// Stores a value under `(dataset, field)`, overwriting any prior value.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache cannot be written.
    fn set(&self, dataset: &str, field: &str, value: i64) -> Result<(), CacheError>;
}

/// In-memory freshness cache; lifetime equals process lifetime.
#[derive(Debug, Default)]
pub struct InMemoryFreshnessCache {
    entries: Arc<RwLock<HashMap<(String, String), i64>>>,
}

impl InMemoryFreshnessCache {
    /// Creates a new empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Creates a new cache wrapped in an Arc.
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Number of cached entries, for tests and diagnostics.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache cannot be read.
    pub fn len(&self) -> Result<usize, CacheError> {
        let entries = self.entries.read().map_err(|_| CacheError::LockError)?;
        Ok(entries.len())
    }

    /// Returns true if the cache holds no entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache cannot be read.
    pub fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.len()? == 0)
    }

    /// Snapshot of all entries, for tests asserting cache contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache cannot be read.
    pub fn snapshot(&self) -> Result<HashMap<(String, String), i64>, CacheError> {
        let entries = self.entries.read().map_err(|_| CacheError::LockError)?;
        Ok(entries.clone())
    }
}

impl FreshnessCache for InMemoryFreshnessCache {
    fn get(&self, dataset: &str, field: &str) -> Result<Option<i64>, CacheError> {
        let entries = self.entries.read().map_err(|_| CacheError::LockError)?;
        Ok(entries
            .get(&(dataset.to_string(), field.to_string()))
            .copied())
    }

    fn set(&self, dataset: &str, field: &str, value: i64) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|_| CacheError::LockError)?;
        entries.insert((dataset.to_string(), field.to_string()), value);
        Ok(())
    }
}
