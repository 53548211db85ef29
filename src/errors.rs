//! Error types for the dashboard client

use std::fmt;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Debug)]
pub enum DashboardError {
    /// HTTP request failed
    Http(reqwest::Error),

    /// Backend answered with a non-success status code
    UnexpectedStatus(reqwest::StatusCode),

    /// JSON deserialization failed
    Json(serde_json::Error),

    /// Configuration error
    Config(String),
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardError::Http(err) => write!(f, "HTTP error: {}", err),
            DashboardError::UnexpectedStatus(status) => {
                write!(f, "unexpected response status: {}", status)
            }
            DashboardError::Json(err) => write!(f, "JSON error: {}", err),
            DashboardError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for DashboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DashboardError::Http(err) => Some(err),
            DashboardError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        DashboardError::Http(err)
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::Json(err)
    }
}
