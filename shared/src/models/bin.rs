//! Sample bin model.
//!
//! A bin is a discrete, timestamped unit of instrument output and the primary
//! unit of freshness measurement.

use serde::{Deserialize, Serialize};

/// A single instrument bin: an identifier plus the sample time of the data it
/// holds.
///
/// Bin lists returned by a [`crate::source::BinSource`] are ordered by
/// `sample_time` descending (newest first). Ties are broken arbitrarily but
/// consistently within one fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleBin {
    /// Opaque bin identifier as assigned by the instrument API.
    pub pid: String,
    /// Sample time as Unix seconds.
    pub sample_time: i64,
}

impl SampleBin {
    /// Creates a new sample bin.
    #[must_use]
    pub fn new(pid: impl Into<String>, sample_time: i64) -> Self {
        Self {
            pid: pid.into(),
            sample_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_bin_new() {
        let bin = SampleBin::new("D20240101T120000_IFCB101", 1_704_110_400);
        assert_eq!(bin.pid, "D20240101T120000_IFCB101");
        assert_eq!(bin.sample_time, 1_704_110_400);
    }

    #[test]
    fn test_sample_bin_serialization() {
        let bin = SampleBin::new("B1", 100);
        let json = serde_json::to_string(&bin).unwrap();
        let back: SampleBin = serde_json::from_str(&json).unwrap();
        assert_eq!(bin, back);
    }
}
