//! Instrument API client.
//!
//! Implements the collaborator traits against the remote instrument-data API
//! over HTTP. Endpoints follow the dashboard API shape: `filter_options` for
//! dataset discovery, `list_bins` for a dataset's bin history,
//! `has_products/{pid}` for product existence, and `time-series/{metric}` for
//! timeline values.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::models::{SampleBin, TimelinePoint};
use crate::source::{BinSource, OracleError, ProductOracle, SourceError, TimelineSource};

/// Wire format for sample times, e.g. `2024-01-01T12:00:00Z`.
const WIRE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Per-request timeout; scans otherwise block indefinitely on a hung API.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct FilterOptionsResponse {
    #[serde(default)]
    dataset_options: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ListBinsResponse {
    data: Vec<BinEntry>,
}

#[derive(Debug, Deserialize)]
struct BinEntry {
    pid: String,
    sample_time: String,
}

#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    #[serde(default)]
    x: Vec<String>,
    #[serde(default)]
    y: Vec<f64>,
}

/// HTTP client for the instrument-data API.
#[derive(Debug, Clone)]
pub struct InstrumentApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl InstrumentApiClient {
    /// Creates a client for the given API base URL (e.g.
    /// `https://ifcb.example.org/api`).
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    /// The configured API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl BinSource for InstrumentApiClient {
    async fn list_datasets(&self) -> Result<Vec<String>, SourceError> {
        let url = format!("{}/filter_options", self.base_url);
        let response = self.http.get(&url).send().await?.error_for_status()?;
        let body: FilterOptionsResponse = response.json().await?;
        Ok(body.dataset_options)
    }

    async fn list_bins(&self, dataset: &str) -> Result<Vec<SampleBin>, SourceError> {
        let url = format!("{}/list_bins", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("dataset", dataset)])
            .send()
            .await?
            .error_for_status()?;
        let body: ListBinsResponse = response.json().await?;
        decode_bins(body)
    }
}

#[async_trait]
impl ProductOracle for InstrumentApiClient {
    async fn has_products(
        &self,
        pid: &str,
    ) -> Result<std::collections::HashMap<String, bool>, OracleError> {
        let url = format!("{}/has_products/{}", self.base_url, pid);
        let response = self.http.get(&url).send().await?;

        // The API answers 500 for bins with no product record at all; that is
        // the expected skip-class outcome, not a failure.
        if response.status() == StatusCode::INTERNAL_SERVER_ERROR {
            return Err(OracleError::NoProducts);
        }

        let response = response.error_for_status()?;
        let body: serde_json::Map<String, serde_json::Value> = response.json().await?;
        Ok(bool_flags(body))
    }
}

#[async_trait]
impl TimelineSource for InstrumentApiClient {
    async fn latest_point(
        &self,
        metric: &str,
        dataset: &str,
    ) -> Result<Option<TimelinePoint>, SourceError> {
        let url = format!("{}/time-series/{}", self.base_url, metric);
        let response = self
            .http
            .get(&url)
            .query(&[("resolution", "bin"), ("dataset", dataset)])
            .send()
            .await?
            .error_for_status()?;
        let body: TimeSeriesResponse = response.json().await?;
        decode_latest_point(body)
    }
}

/// Parses a wire-format sample time into Unix seconds.
///
/// # Errors
///
/// Returns [`SourceError::InvalidTimestamp`] when the value does not match
/// the wire format.
pub fn parse_sample_time(value: &str) -> Result<i64, SourceError> {
    NaiveDateTime::parse_from_str(value, WIRE_TIME_FORMAT)
        .map(|dt| dt.and_utc().timestamp())
        .map_err(|e| SourceError::InvalidTimestamp {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

fn decode_bins(body: ListBinsResponse) -> Result<Vec<SampleBin>, SourceError> {
    let mut bins = body
        .data
        .into_iter()
        .map(|entry| {
            let sample_time = parse_sample_time(&entry.sample_time)?;
            Ok(SampleBin::new(entry.pid, sample_time))
        })
        .collect::<Result<Vec<_>, SourceError>>()?;
    // Newest first; stable sort keeps tie order consistent within a fetch.
    bins.sort_by_key(|bin| std::cmp::Reverse(bin.sample_time));
    Ok(bins)
}

fn bool_flags(body: serde_json::Map<String, serde_json::Value>) -> std::collections::HashMap<String, bool> {
    body.into_iter()
        .filter_map(|(key, value)| value.as_bool().map(|flag| (key, flag)))
        .collect()
}

fn decode_latest_point(body: TimeSeriesResponse) -> Result<Option<TimelinePoint>, SourceError> {
    match (body.x.last(), body.y.last()) {
        (Some(raw_time), Some(&value)) => {
            let timestamp = parse_sample_time(raw_time)?;
            Ok(Some(TimelinePoint { value, timestamp }))
        }
        (None, None) => Ok(None),
        _ => Err(SourceError::Decode(
            "time-series x and y arrays differ in length".to_string(),
        )),
    }
}
