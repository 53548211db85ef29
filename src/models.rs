//! Dashboard value objects
//!
//! Every fetch call produces an independent snapshot of these types; nothing
//! here is persisted or shared.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApiState {
    Up,
    Down,
}

impl std::fmt::Display for ApiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiState::Up => write!(f, "up"),
            ApiState::Down => write!(f, "down"),
        }
    }
}

/// Current status of one monitored API
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiStatus {
    pub name: String,
    pub status: ApiState,
    /// Mean latency in milliseconds, 0 when no latency data was available
    pub latency_ms: f64,
    pub last_check: DateTime<Utc>,
}

/// One sample of a latency history series
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LatencyHistoryPoint {
    pub time: DateTime<Utc>,
    pub latency_ms: f64,
}

/// Cumulative check counts; the backend reports counters as floats
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct CheckTotals {
    pub up: f64,
    pub down: f64,
}
