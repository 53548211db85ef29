//! Configuration for the dashboard client

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the Prometheus-compatible query API
    pub prometheus_url: String,

    /// HTTP timeout for backend requests
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prometheus_url: "http://localhost:9090".to_string(),
            http_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(prometheus_url) = env::var("PROMETHEUS_URL") {
            config.prometheus_url = prometheus_url;
        }

        if let Ok(timeout) = env::var("HTTP_TIMEOUT_SECONDS") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.http_timeout = Duration::from_secs(seconds);
            }
        }

        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.prometheus_url.is_empty() {
            return Err("prometheus_url cannot be empty".to_string());
        }

        if !self.prometheus_url.starts_with("http://")
            && !self.prometheus_url.starts_with("https://")
        {
            return Err("prometheus_url must be an http(s) URL".to_string());
        }

        Ok(())
    }
}
