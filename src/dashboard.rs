//! Dashboard fetch operations against the metrics backend
//!
//! Every public operation here is total: any failure is logged and degrades
//! to the documented default (empty list, zero counts, latency 0) so no
//! error ever reaches the caller.

use crate::config::Config;
use crate::errors::{DashboardError, Result};
use crate::models::{ApiState, ApiStatus, CheckTotals, LatencyHistoryPoint};
use crate::prometheus::{PromClient, QueryResponse, SamplePair};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{error, info, warn};

/// Status samples older than this are treated as unavailable, not as "down"
const STALENESS_WINDOW_MS: f64 = 5.0 * 60.0 * 1000.0;

/// Range-query resolution in seconds
const RANGE_STEP_SECS: u64 = 15;

/// Default latency-history window in minutes
pub const DEFAULT_HISTORY_MINUTES: u64 = 30;

/// Fetches dashboard data from a Prometheus-compatible backend.
///
/// API names are interpolated into query expressions verbatim; callers must
/// ensure they contain no query-breaking characters.
#[derive(Clone, Debug)]
pub struct DashboardFetcher {
    prom: PromClient,
}

impl DashboardFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate().map_err(DashboardError::Config)?;

        Ok(Self {
            prom: PromClient::new(config.prometheus_url.clone(), config.http_timeout)?,
        })
    }

    /// Current status of every monitored API.
    ///
    /// Queries `health_check_status`, drops samples older than five minutes,
    /// then resolves each surviving API's mean latency with one concurrent
    /// instant query per API. A backend failure yields an empty list; a
    /// single API's latency failure leaves that latency at 0.
    pub async fn fetch_api_statuses(&self) -> Vec<ApiStatus> {
        let response = match self.prom.query("health_check_status").await {
            Ok(response) => response,
            Err(e) => {
                error!("failed to fetch API statuses: {}", e);
                return Vec::new();
            }
        };

        let cutoff_ms = Utc::now().timestamp_millis() as f64 - STALENESS_WINDOW_MS;

        let mut statuses = Vec::new();
        for series in response.result() {
            let Some(sample) = series.value.as_ref() else {
                continue;
            };
            let name = series.metric.get("api_name").cloned().unwrap_or_default();

            // NaN timestamps fail this comparison and drop the row
            let last_check_ms = sample.timestamp_ms();
            if !(last_check_ms > cutoff_ms) {
                info!("status sample for \"{}\" is not recent, ignoring", name);
                continue;
            }

            let status = if sample.value() == 1.0 {
                ApiState::Up
            } else {
                ApiState::Down
            };

            statuses.push(ApiStatus {
                name,
                status,
                latency_ms: 0.0,
                last_check: datetime_from_ms(last_check_ms),
            });
        }

        join_all(statuses.into_iter().map(|mut status| async move {
            match self.prom.query(&latency_expr(&status.name)).await {
                Ok(response) => {
                    if let Some(latency_ms) = extract_latency_ms(&response) {
                        status.latency_ms = latency_ms;
                    }
                }
                Err(e) => {
                    error!("failed to fetch latency for {}: {}", status.name, e);
                }
            }
            status
        }))
        .await
    }

    /// Latency history for one API over the last `minutes` minutes.
    ///
    /// Tries a range query of the direct sum/count ratio first; if the
    /// request itself fails, retries with a rate-based expression. When
    /// neither yields range data, falls back to the current instant reading,
    /// attempted twice, and returns it as a single-point series.
    pub async fn fetch_latency_history(
        &self,
        api_name: &str,
        minutes: u64,
    ) -> Vec<LatencyHistoryPoint> {
        let end = Utc::now().timestamp();
        let start = end - (minutes as i64) * 60;
        let direct = latency_expr(api_name);

        let response = match self
            .prom
            .query_range(&direct, start, end, RANGE_STEP_SECS)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                info!(
                    "direct range query for {} failed ({}), trying rate-based query",
                    api_name, e
                );
                match self
                    .prom
                    .query_range(&rate_expr(api_name), start, end, RANGE_STEP_SECS)
                    .await
                {
                    Ok(response) => response,
                    Err(e) => {
                        warn!("rate-based range query for {} failed: {}", api_name, e);
                        QueryResponse::default()
                    }
                }
            }
        };

        if let Some(series) = response.result().first() {
            if !series.values.is_empty() {
                return series.values.iter().filter_map(history_point).collect();
            }
        }

        // No range data at all; fall back to the current instant reading.
        // The second identical attempt preserves the original fallback chain.
        for attempt in 1..=2 {
            match self.prom.query(&direct).await {
                Ok(response) => {
                    if let Some(point) = response.first_value().and_then(history_point) {
                        return vec![point];
                    }
                }
                Err(e) => {
                    info!(
                        "instant latency query for {} failed (attempt {}): {}",
                        api_name, attempt, e
                    );
                }
            }
        }

        Vec::new()
    }

    /// Cumulative up/down check counts for one API.
    ///
    /// Two independent instant queries; a missing or malformed result leaves
    /// the corresponding count at 0. Counter values are otherwise trusted
    /// as-is.
    pub async fn fetch_total_checks(&self, api_name: &str) -> CheckTotals {
        let up_expr = total_expr(api_name, "up");
        let down_expr = total_expr(api_name, "down");
        let (up, down) = tokio::join!(
            self.counter_value(&up_expr, api_name),
            self.counter_value(&down_expr, api_name),
        );

        CheckTotals { up, down }
    }

    async fn counter_value(&self, expr: &str, api_name: &str) -> f64 {
        match self.prom.query(expr).await {
            Ok(response) => response
                .first_value()
                .map(SamplePair::value)
                .filter(|value| !value.is_nan())
                .unwrap_or(0.0),
            Err(e) => {
                error!("failed to fetch check totals for {}: {}", api_name, e);
                0.0
            }
        }
    }
}

/// Mean latency as a ratio of the duration counters for one API
fn latency_expr(api_name: &str) -> String {
    format!(
        "health_check_duration_seconds_sum{{api_name=\"{0}\"}} / health_check_duration_seconds_count{{api_name=\"{0}\"}}",
        api_name
    )
}

fn rate_expr(api_name: &str) -> String {
    format!(
        "rate(health_check_duration_seconds_sum{{api_name=\"{0}\"}}[1m]) / rate(health_check_duration_seconds_count{{api_name=\"{0}\"}}[1m])",
        api_name
    )
}

fn total_expr(api_name: &str, status: &str) -> String {
    format!(
        "health_check_total{{api_name=\"{}\",status=\"{}\"}}",
        api_name, status
    )
}

/// First sample's value in milliseconds, if it parses finite and non-negative
fn extract_latency_ms(response: &QueryResponse) -> Option<f64> {
    response
        .first_value()
        .map(SamplePair::value)
        .filter(|seconds| seconds.is_finite() && *seconds >= 0.0)
        .map(|seconds| seconds * 1000.0)
}

/// Map one backend sample to a history point; invalid samples are dropped
fn history_point(sample: &SamplePair) -> Option<LatencyHistoryPoint> {
    let latency_s = sample.value();
    if !latency_s.is_finite() || latency_s < 0.0 {
        return None;
    }

    let timestamp_ms = sample.timestamp_ms();
    if !timestamp_ms.is_finite() {
        return None;
    }

    Some(LatencyHistoryPoint {
        time: datetime_from_ms(timestamp_ms),
        latency_ms: latency_s * 1000.0,
    })
}

fn datetime_from_ms(ms: f64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms as i64).unwrap_or_default()
}
