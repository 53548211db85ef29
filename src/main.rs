//! Health Dashboard CLI
//!
//! Plays the role of the dashboard caller: fetches one view of the health
//! data and prints it as JSON to stdout. Logs go to stderr.

use clap::{Parser, Subcommand};
use health_dashboard::{Config, DEFAULT_HISTORY_MINUTES, DashboardFetcher};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "health-dashboard", version, about = "Query API health data from a Prometheus backend")]
struct Cli {
    /// Base URL of the Prometheus query API
    #[arg(long, env = "PROMETHEUS_URL")]
    prometheus_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Current up/down status and latency of every monitored API
    Status,

    /// Latency history for one API
    History {
        api_name: String,

        /// Window size in minutes
        #[arg(long, default_value_t = DEFAULT_HISTORY_MINUTES)]
        minutes: u64,
    },

    /// Cumulative up/down check counts for one API
    Totals { api_name: String },
}

#[tokio::main]
async fn main() {
    initialize_tracing();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(url) = cli.prometheus_url {
        config.prometheus_url = url;
    }

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        std::process::exit(1);
    }

    let fetcher = match DashboardFetcher::new(&config) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!("Failed to create dashboard fetcher: {}", e);
            std::process::exit(1);
        }
    };

    let output = match cli.command {
        Command::Status => serde_json::to_string_pretty(&fetcher.fetch_api_statuses().await),
        Command::History { api_name, minutes } => {
            serde_json::to_string_pretty(&fetcher.fetch_latency_history(&api_name, minutes).await)
        }
        Command::Totals { api_name } => {
            serde_json::to_string_pretty(&fetcher.fetch_total_checks(&api_name).await)
        }
    };

    match output {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!("Failed to serialize output: {}", e);
            std::process::exit(1);
        }
    }
}

/// Initialize structured logging on stderr
fn initialize_tracing() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&log_level))
        .unwrap();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
