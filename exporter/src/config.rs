//! Exporter configuration module.
//!
//! Flags can also be supplied via environment variables, which keeps
//! container deployments flag-free.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

const SECS_PER_HOUR: u64 = 3600;
const SECS_PER_DAY: u64 = 86_400;

/// Binsight exporter - polls the instrument API and republishes freshness metrics
#[derive(Debug, Clone, Parser)]
#[command(name = "binsight-exporter")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Base URL for the instrument API (e.g. https://ifcb.example.org/api)
    #[arg(long, env = "BINSIGHT_BASE_URL")]
    pub base_url: String,

    /// Host address to bind the metrics endpoint to
    #[arg(long, env = "BINSIGHT_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to expose metrics on
    #[arg(long, env = "BINSIGHT_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Seconds between polling cycles
    #[arg(long, env = "BINSIGHT_INTERVAL", default_value_t = 900)]
    pub interval: u64,

    /// Hours the newest bin may lag wall clock before the dataset counts as stale
    #[arg(long, env = "BINSIGHT_LAG_THRESHOLD_HOURS", default_value_t = 24)]
    pub lag_threshold_hours: u64,

    /// Days of bin history re-scanned once all products are cached
    #[arg(long, env = "BINSIGHT_LOOKBACK_DAYS", default_value_t = 14)]
    pub lookback_days: u64,
}

impl Config {
    /// Returns the socket address for binding.
    ///
    /// # Panics
    ///
    /// Panics if the host and port combination cannot be parsed as a valid
    /// socket address.
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address from config")
    }

    /// Time between polling cycles.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    /// Wall-clock lag threshold for the up-to-date flag.
    #[must_use]
    pub fn lag_threshold(&self) -> Duration {
        Duration::from_secs(self.lag_threshold_hours * SECS_PER_HOUR)
    }

    /// Lookback window for steady-state scans.
    #[must_use]
    pub fn lookback(&self) -> Duration {
        Duration::from_secs(self.lookback_days * SECS_PER_DAY)
    }
}
