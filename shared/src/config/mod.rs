//! Configuration structures shared across the workspace.

pub mod products;

pub use products::{ProductSpec, ProductTable, LATEST_BIN_FIELD};
