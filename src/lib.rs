//! Health Dashboard Client Library
//!
//! This library provides a thin client over a Prometheus-compatible query
//! API, producing up/down status, recent latency, and historical latency
//! trends for a set of monitored APIs.

pub mod config;
pub mod dashboard;
pub mod errors;
pub mod models;
pub mod prometheus;

pub use config::Config;
pub use dashboard::{DEFAULT_HISTORY_MINUTES, DashboardFetcher};
pub use errors::{DashboardError, Result};
pub use models::{ApiState, ApiStatus, CheckTotals, LatencyHistoryPoint};
