//! Prometheus HTTP query API client and response envelope
//!
//! The backend exposes two endpoints: `/api/v1/query` (instant, latest sample
//! per series) and `/api/v1/query_range` (windowed samples at a fixed step).
//! Responses are modeled as explicit structs with optional fields so absent
//! envelope layers degrade to empty results instead of panicking.

use crate::errors::{DashboardError, Result};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// One `[timestamp, "value"]` tuple from the backend.
///
/// Timestamps normally arrive as JSON numbers but some backends emit numeric
/// strings; an unparsable timestamp becomes NaN, which fails every recency
/// comparison downstream and drops the row.
#[derive(Clone, Debug, Deserialize)]
pub struct SamplePair(
    #[serde(deserialize_with = "timestamp_or_nan")] pub f64,
    pub String,
);

impl SamplePair {
    /// Sample time in milliseconds since the Unix epoch
    pub fn timestamp_ms(&self) -> f64 {
        self.0 * 1000.0
    }

    /// Parse the sample value, NaN when the string is not numeric
    pub fn value(&self) -> f64 {
        self.1.trim().parse().unwrap_or(f64::NAN)
    }
}

fn timestamp_or_nan<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    })
}

/// One time series in a query result
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Series {
    #[serde(default)]
    pub metric: HashMap<String, String>,

    /// Instant-query sample
    #[serde(default)]
    pub value: Option<SamplePair>,

    /// Range-query samples
    #[serde(default)]
    pub values: Vec<SamplePair>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct QueryData {
    #[serde(rename = "resultType", default)]
    pub result_type: Option<String>,

    #[serde(default)]
    pub result: Vec<Series>,
}

/// Top-level response envelope shared by instant and range queries
#[derive(Clone, Debug, Default, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub data: Option<QueryData>,
}

impl QueryResponse {
    /// Result rows, empty when any envelope layer is absent
    pub fn result(&self) -> &[Series] {
        self.data
            .as_ref()
            .map(|data| data.result.as_slice())
            .unwrap_or(&[])
    }

    /// First instant-query sample, if the first row carries one
    pub fn first_value(&self) -> Option<&SamplePair> {
        self.result().first().and_then(|series| series.value.as_ref())
    }
}

/// Client for the Prometheus query endpoints
#[derive(Clone, Debug)]
pub struct PromClient {
    client: reqwest::Client,
    base_url: String,
}

impl PromClient {
    pub fn new(base_url: String, http_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(http_timeout)
            .user_agent(format!("health-dashboard/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(DashboardError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Issue an instant query
    pub async fn query(&self, expr: &str) -> Result<QueryResponse> {
        let url = format!("{}/api/v1/query", self.base_url);
        debug!("instant query `{}` against {}", expr, url);

        let response = self
            .client
            .get(url)
            .query(&[("query", expr)])
            .send()
            .await
            .map_err(DashboardError::Http)?;

        Self::decode(response).await
    }

    /// Issue a range query over `[start, end]` seconds at the given step
    pub async fn query_range(
        &self,
        expr: &str,
        start: i64,
        end: i64,
        step_secs: u64,
    ) -> Result<QueryResponse> {
        let url = format!("{}/api/v1/query_range", self.base_url);
        debug!(
            "range query `{}` against {} (start={}, end={}, step={})",
            expr, url, start, end, step_secs
        );

        let response = self
            .client
            .get(url)
            .query(&[
                ("query", expr),
                ("start", &start.to_string()),
                ("end", &end.to_string()),
                ("step", &step_secs.to_string()),
            ])
            .send()
            .await
            .map_err(DashboardError::Http)?;

        Self::decode(response).await
    }

    async fn decode(response: reqwest::Response) -> Result<QueryResponse> {
        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::UnexpectedStatus(status));
        }

        let body = response.text().await.map_err(DashboardError::Http)?;
        serde_json::from_str(&body).map_err(DashboardError::Json)
    }
}
