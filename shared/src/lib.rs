//! Binsight Shared Library
//!
//! This crate contains the data models, freshness cache, freshness scanner,
//! and instrument API client used across the Binsight exporter.
//!
//! # Modules
//!
//! - [`models`] - Data models for bins, freshness records, and timeline
//!   metrics
//! - [`config`] - The product table built once at configuration time
//! - [`cache`] - The per-(dataset, field) freshness cache
//! - [`source`] - Collaborator traits and the error taxonomy
//! - [`scanner`] - The incremental freshness-detection algorithm
//! - [`client`] - HTTP client for the instrument-data API
//! - [`sink`] - The metrics sink contract
//!
//! # Example
//!
//! ```
//! use shared::config::ProductTable;
//! use shared::models::FreshnessRecord;
//!
//! let products = ProductTable::from_names(["blobs", "features"]);
//! let record = FreshnessRecord::no_data(&products);
//!
//! assert!(!record.is_up_to_date);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cache;
pub mod client;
pub mod config;
pub mod models;
pub mod scanner;
pub mod sink;
pub mod source;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde;
pub use serde_json;
